pub mod aliases;
pub mod checker;
pub mod table;
pub mod types;

pub use checker::{DrugInteractionChecker, InteractionApi};
pub use table::scan_contraindications;
pub use types::{DrugInteraction, InteractionError, InteractionSeverity};
