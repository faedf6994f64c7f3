//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a successful authentication.
#[derive(Clone, Copy, Debug)]
pub struct Authentication;
