//! Pipeline components: bounded channel, crawlers, workers, shutdown coordination.

pub mod cancel;
pub mod channel;
pub mod context;
pub mod counter;
pub mod crawler;
pub mod filter;
pub mod lister;
pub mod orchestrator;
pub mod shutdown;
pub mod visited;
pub mod worker;

pub use cancel::CancelToken;
pub use channel::{BoundedChannel, ChannelReceiver, ChannelSender, ChannelStats};
pub use context::{PipelineCanceller, PipelineHandle};
pub use counter::IndexCounter;
pub use crawler::{Crawler, spawn_crawler_thread};
pub use filter::{AcceptFn, NameFilter, accept_all, crawl_predicate};
pub use lister::{DirLister, FsLister};
pub use orchestrator::{resolve_visited_scope, start_pipeline};
pub use shutdown::{ShutdownCoordinator, ShutdownOutcome, spawn_coordinator_thread};
pub use visited::VisitedSet;
pub use worker::{Indexer, Worker, spawn_worker_thread};
