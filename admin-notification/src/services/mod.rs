pub mod dispatcher;
pub mod reconciler;

pub use dispatcher::{Mutation, MutationDispatcher};
pub use reconciler::{merge, FetchMode, MergeStats, Merged, ReadCache};
