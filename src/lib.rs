pub mod cli;
pub mod commands;
pub mod config;
pub mod gate;
pub mod hook;
pub mod logging;
pub mod publish;
pub mod state;

pub use config::Config;
pub use gate::PublishGate;
pub use hook::ReportingHook;
pub use publish::{ElasticPublisher, PublishError, PublishOutcome, RecordSink};
pub use state::{RunRecord, TestContext, TestStatus};
