pub mod claude;
pub mod deepseek;
pub mod flexible;
pub mod mock;

pub use claude::*;
pub use deepseek::*;
pub use flexible::*;
pub use mock::*;
