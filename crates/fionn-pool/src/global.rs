//! The three lazily-initialized global pools.
//!
//! Global mutable state is confined to exactly these three pools and
//! the one-shot flag that initializes them (`OnceLock` makes the
//! initialization idempotent and thread-safe for free — there is no
//! separate barrier to get wrong).

use crate::slab::SyncObjectPool;
use fionn_core::{Property, SchemaNode, SchemaType};
use std::sync::OnceLock;

/// Cells drawn from the schema-node pool hold one [`SchemaNode`] each.
pub const SCHEMA_NODE_POOL_CAPACITY: usize = 2000;
/// Cells drawn from the property pool hold one [`Property`] each.
pub const PROPERTY_POOL_CAPACITY: usize = 1000;
/// Scratch cells reused by workers for short-lived byte buffers
/// (e.g. intermediate key construction) — the generic analogue of the
/// source's fixed-size `ThreadData` cell.
pub const TASK_SCRATCH_POOL_CAPACITY: usize = 500;
/// Scratch cell size in bytes.
pub const TASK_SCRATCH_CELL_SIZE: usize = 64;

struct GlobalPools {
    schema_nodes: SyncObjectPool<SchemaNode>,
    properties: SyncObjectPool<Property>,
    task_scratch: SyncObjectPool<Vec<u8>>,
}

static POOLS: OnceLock<GlobalPools> = OnceLock::new();

fn pools() -> &'static GlobalPools {
    POOLS.get_or_init(|| GlobalPools {
        schema_nodes: SyncObjectPool::new(SCHEMA_NODE_POOL_CAPACITY, || SchemaNode::leaf(SchemaType::Null)),
        properties: SyncObjectPool::new(PROPERTY_POOL_CAPACITY, || Property {
            name: Box::from(""),
            schema: SchemaNode::leaf(SchemaType::Null),
            required: false,
        }),
        task_scratch: SyncObjectPool::new(TASK_SCRATCH_POOL_CAPACITY, || {
            Vec::with_capacity(TASK_SCRATCH_CELL_SIZE)
        }),
    })
}

/// Borrow a schema-node cell from the global pool.
#[must_use]
pub fn alloc_schema_node() -> Box<SchemaNode> {
    pools().schema_nodes.alloc()
}

/// Return a schema-node cell to the global pool.
pub fn free_schema_node(cell: Box<SchemaNode>) {
    pools().schema_nodes.free(cell);
}

/// Borrow a property cell from the global pool.
#[must_use]
pub fn alloc_property() -> Box<Property> {
    pools().properties.alloc()
}

/// Return a property cell to the global pool.
pub fn free_property(cell: Box<Property>) {
    pools().properties.free(cell);
}

/// Borrow a scratch buffer from the global task pool.
#[must_use]
pub fn alloc_task_scratch() -> Box<Vec<u8>> {
    let mut buf = pools().task_scratch.alloc();
    buf.clear();
    buf
}

/// Return a scratch buffer to the global task pool.
pub fn free_task_scratch(cell: Box<Vec<u8>>) {
    pools().task_scratch.free(cell);
}
