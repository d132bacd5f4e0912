pub(crate) mod memory_manager;
