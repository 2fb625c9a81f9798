pub mod event;
pub mod exon;
pub mod window;

// re-export for cleaner imports
pub use self::event::{EditEvent, EventKind};
pub use self::exon::{Exon, ExonModel, Strand};
pub use self::window::{ReferenceSlice, TargetWindow};
