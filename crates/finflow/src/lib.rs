pub mod config;
pub mod emi;
pub mod error;
pub mod flows;
pub mod records;
pub mod repo;
pub mod services;
pub mod store;

pub use config::{load_config, load_config_from_str, ProductConfig, SimulationDelays};
pub use emi::{EmiQuote, Installment, InstallmentStatus};
pub use error::{ConfigError, FinflowError, FlowError, Result, StoreError, ValidationError};
pub use flows::{
    entry_point, redirect_for, services_gate, EwaFlow, EwaSetupStep, KycFlow, LoanFlow,
    LoanRequest, RegistrationFlow, Route,
};
pub use services::Simulator;
pub use store::{default_store_path, FileStore, KeyValueStore, MemoryStore};
