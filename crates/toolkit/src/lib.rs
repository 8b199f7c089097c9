//! Process-level access to the external modeling toolkit.
//!
//! [`driver::Toolkit`] describes the toolkit operations the utilities rely
//! on; [`driver::imod::ImodToolkit`] implements them by building and running
//! IMOD command lines. [`sources`] validates input and output paths and
//! [`staging`] owns the temporary directory intermediate files live in.

pub mod driver;
pub mod sources;
pub mod staging;

pub use driver::imod::ImodToolkit;
pub use driver::{HeaderField, PointModelRequest, Toolkit, ToolkitError};
pub use sources::{FileSink, FileSource, Sink, Source};
pub use staging::StagingDir;
