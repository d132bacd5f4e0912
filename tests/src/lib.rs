use std::sync::Once;

use common::RID;
use storage::{BPlusTreeLeafPage, GenericComparator, GenericKey};

pub type LeafPage<const N: usize> = BPlusTreeLeafPage<GenericKey<N>, RID>;

static INIT: Once = Once::new();

/// Installs a tracing subscriber once per test binary. `RUST_LOG` overrides
/// the default `warn` filter.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

pub fn key<const N: usize>(value: i64) -> GenericKey<N> {
    GenericKey::from_integer(value)
}

/// Record id derived from a key the way the bustub tests do: high bits as page
/// id, low 32 bits as slot.
pub fn rid_for(value: i64) -> RID {
    RID::new((value >> 32) as usize, (value & 0xFFFF_FFFF) as u32)
}

pub fn comparator<const N: usize>() -> GenericComparator<N> {
    GenericComparator
}

pub fn live_keys<const N: usize>(page: &LeafPage<N>) -> Vec<i64> {
    page.entries().iter().map(|(k, _)| k.to_integer()).collect()
}
