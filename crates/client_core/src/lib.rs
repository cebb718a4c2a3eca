//! Client core for the registrant accreditation portal: the table view
//! engine, the spreadsheet endpoint gateway, and the controller tying them
//! together.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod orchestration;
pub mod view;

pub use controller::{
    AccreditFlow, ConfirmationPrompt, GatewayCommand, GatewayEvent, LoadPhase, Notification,
    NotificationLevel, RegistrantController,
};
pub use error::{ActionRejected, TransportError};
pub use gateway::{GatewayConfig, HttpGateway, MutationPolicy, RegistrantGateway};
pub use orchestration::{execute, spawn_worker, Portal};
pub use view::{view, view_refs, EmptyState};
