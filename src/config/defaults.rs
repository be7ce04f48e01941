//! Builder path constants and builtin defaults.

/// Name of the default section. Its options are visible as fallback
/// values in every other section.
pub const DEFAULT_SECTION: &str = "build";

/// Build cache directory
pub const BUILDDIR: &str = "/var/cache/deb-ostree-builder";

/// System configuration directory searched for config files
pub const SYSCONFDIR: &str = "/etc/deb-ostree-builder";

/// Build lock file
pub const LOCKFILE: &str = "/var/lock/deb-ostree-builder.lock";

/// Default time in seconds to wait for the build lock
pub const LOCK_TIMEOUT: u64 = 60;
