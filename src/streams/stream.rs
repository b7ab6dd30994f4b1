use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::Error;

/// Pull-based source of [`Instance`]s sharing one schema.
///
/// Implementations may be finite (files) or unbounded (generators). Every
/// instance yielded must conform to the [`InstanceHeader`] returned by
/// [`header`](Stream::header) for the whole lifetime of the stream.
pub trait Stream {
    /// Relation name, attributes and class index of the stream.
    fn header(&self) -> &InstanceHeader;

    /// Whether the stream may still produce instances.
    ///
    /// Once this returns `false`, [`next_instance`](Stream::next_instance)
    /// must return `None`.
    fn has_more_instances(&self) -> bool;

    /// Produces the next instance, or `None` when the stream is exhausted.
    ///
    /// Sources with malformed records skip them rather than panic.
    fn next_instance(&mut self) -> Option<Box<dyn Instance>>;

    /// Rewinds the stream. File streams seek back to the data section and
    /// generators re-seed their RNG. The header does not change.
    fn restart(&mut self) -> Result<(), Error>;
}
