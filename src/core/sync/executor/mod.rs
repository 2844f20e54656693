/*!
 * Lock-Backed Executors
 *
 * Run caller tasks on the calling thread while holding a lock:
 * - `SynchronizedExecutor`: one reentrant mutex
 * - `ReadWriteSynchronizedExecutor`: shared read / exclusive write
 * - `PerKeyExecutor` / `PerKeyReadWriteExecutor`: one of the above per key,
 *   leased from a sharded registry
 */

mod per_key;
mod read_write;
mod synchronized;
mod traits;

pub use per_key::{PerKeyExecutor, PerKeyReadWriteExecutor};
pub use read_write::ReadWriteSynchronizedExecutor;
pub use synchronized::SynchronizedExecutor;
pub use traits::Executor;
