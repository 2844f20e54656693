/*!
 * Keyed Resource Registries
 *
 * Per-key shared resources with reference-counted lifetimes:
 * - `KeyedResourceRegistry`: one concurrent map, CAS-updated entries
 * - `ShardedKeyedRegistry`: N independent registries routed by hash
 * - `ResourceLease`: scoped acquire/release
 */

mod entry;
mod keyed;
mod lease;
mod sharded;

pub use keyed::{KeyedResourceRegistry, ResourceFactory};
pub use lease::ResourceLease;
pub use sharded::ShardedKeyedRegistry;
