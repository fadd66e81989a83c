pub mod announcers;
pub mod config;
pub mod inventory;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod stage;
pub mod testing;
pub mod tracker;
pub mod validators;

pub use announcers::{Announcer, JsonLinesAnnouncer, LogAnnouncer};
pub use config::{
    load_config, load_config_from_str, validate_config, AnnouncerBackend, AnnouncerConfig,
    Config, ConfigError, InventoryConfig, LoggingConfig, StagingConfig, ValidatorConfig,
};
pub use inventory::{Inventory, InventoryError, StaticInventory};
pub use model::{
    Metadata, ServiceDescriptor, StatusCode, StatusRecord, ValidationOutcome, ValidationRequest,
    Verdict,
};
pub use pipeline::{Collaborators, Pipeline, PipelineConfig, PipelineHandle};
pub use stage::{LocalStager, StageError, StageInput, Stager};
pub use tracker::{create_tracker, Tracker, TrackerHandle, TrackerWriter};
pub use validators::{
    outcome_channels, OutcomeEvent, OutcomeReceiver, OutcomeSender, ServiceRegistry,
    SimulationConfig, SimulationValidator, Validator, ValidatorError,
};
