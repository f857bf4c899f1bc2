use std::sync::Arc;

use crate::container::memory;
use crate::enumerator::{BlobContainerEnumerable, BlobItem, Options};

pub fn create_memory_container(names: &[&str]) -> memory::Backend {
    memory::Backend::with_names(names.iter().copied())
}

pub fn create_enumerable(container: &memory::Backend, options: Options) -> BlobContainerEnumerable {
    BlobContainerEnumerable::with_options(Arc::new(container.clone()), options)
        .expect("Failed to create enumerable")
}

pub fn blob_names(items: &[BlobItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}
