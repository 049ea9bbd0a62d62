//! XML namespaces used by GData feeds

/// Atom syndication format
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Google Data extension elements, bound to the `gd` prefix
pub const GDATA_NAMESPACE: &str = "http://schemas.google.com/g/2005";

/// Atom publishing protocol
pub const APP_NAMESPACE: &str = "http://www.w3.org/2007/app";

pub const GDATA_PREFIX: &str = "gd";

/// Category scheme identifying the kind of an entry
pub const KIND_SCHEME: &str = "http://schemas.google.com/g/2005#kind";
