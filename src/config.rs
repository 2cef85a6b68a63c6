//! Run configuration: name server thresholds and filesystem locations.

use std::path::{Path, PathBuf};

use crate::error::ParamError;

/// Lowest accepted value for either threshold.
pub const MIN_NAMESERVERS_FLOOR: i64 = 1;

/// Most name servers the stock resolver library will use.
pub const MAX_NAMESERVERS_CEILING: i64 = 3;

/// Acceptable name server count range for a run.
///
/// # Example
///
/// ```
/// use check_dns::RunParameters;
///
/// let params = RunParameters::new(1, 2).unwrap();
/// assert_eq!(params.min_nameservers(), 1);
/// assert_eq!(params.max_nameservers(), 2);
/// assert!(RunParameters::new(3, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParameters {
    min_nameservers: usize,
    max_nameservers: usize,
}

impl RunParameters {
    /// Validates `1 <= min <= max <= 3`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] describing the first violated bound.
    pub fn new(min: i64, max: i64) -> Result<Self, ParamError> {
        if !(MIN_NAMESERVERS_FLOOR..=MAX_NAMESERVERS_CEILING).contains(&min) {
            return Err(ParamError::MinOutOfRange(min));
        }
        if !(MIN_NAMESERVERS_FLOOR..=MAX_NAMESERVERS_CEILING).contains(&max) {
            return Err(ParamError::MaxOutOfRange(max));
        }
        if min > max {
            return Err(ParamError::MinAboveMax { min, max });
        }

        // Both values are within 1..=3 here.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (min_nameservers, max_nameservers) = (min as usize, max as usize);
        Ok(Self {
            min_nameservers,
            max_nameservers,
        })
    }

    /// Builds parameters from the optional positional arguments, filling in
    /// the defaults of 2 and 3.
    ///
    /// # Errors
    ///
    /// See [`RunParameters::new`].
    pub fn from_args(min: Option<i64>, max: Option<i64>) -> Result<Self, ParamError> {
        Self::new(min.unwrap_or(2), max.unwrap_or(MAX_NAMESERVERS_CEILING))
    }

    #[must_use]
    pub const fn min_nameservers(&self) -> usize {
        self.min_nameservers
    }

    #[must_use]
    pub const fn max_nameservers(&self) -> usize {
        self.max_nameservers
    }
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            min_nameservers: 2,
            max_nameservers: 3,
        }
    }
}

/// Filesystem locations consulted during a run.
///
/// [`Paths::with_root`] prefixes every location with a directory so tests can
/// lay out a fake `/etc` and `/run` in a tempdir.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Classic resolver configuration.
    pub resolv_conf: PathBuf,
    /// Present when systemd-resolved manages `/etc/resolv.conf`.
    pub stub_marker: PathBuf,
    /// Upstream servers as generated by systemd-resolved.
    pub systemd_resolv_conf: PathBuf,
    /// AIX name resolution order.
    pub netsvc_conf: PathBuf,
    /// Directories searched for executables, in order.
    pub tool_dirs: Vec<PathBuf>,
}

impl Paths {
    /// Default system locations.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root("/")
    }

    /// Every location relative to `root` instead of `/`.
    #[must_use]
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            resolv_conf: root.join("etc/resolv.conf"),
            stub_marker: root.join("run/systemd/resolve/stub-resolv.conf"),
            systemd_resolv_conf: root.join("run/systemd/resolve/resolv.conf"),
            netsvc_conf: root.join("etc/netsvc.conf"),
            tool_dirs: ["usr/bin", "usr/sbin", "bin", "sbin", "usr/local/bin"]
                .iter()
                .map(|dir| root.join(dir))
                .collect(),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
