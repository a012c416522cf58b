use heapless::{String, Vec};

/// Errors reported by a [`VolumeService`].
///
/// Backends map their own error types onto these variants so the rest of
/// the appliance can report failures uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VolumeError {
    /// No volume or file with the given name exists.
    NotFound,
    /// The medium is missing or not initialised.
    NotReady,
    /// The filesystem on the medium could not be understood.
    BadFormat,
    /// A read from the medium failed.
    ReadFailed,
    /// A write to the medium failed.
    WriteFailed,
    /// The medium is full.
    NoSpace,
    /// A file or directory name was not valid for the filesystem.
    InvalidName,
    /// The backend cannot perform this operation.
    Unsupported,
    /// The underlying block device reported an error.
    DeviceError,
    /// The operation needs a mounted volume and none is mounted.
    NotMounted,
    /// The volume is already mounted.
    AlreadyMounted,
    /// The backend ran out of file or directory handles.
    TooManyOpenFiles,
}

impl VolumeError {
    /// Short human-readable description, used in console messages.
    pub fn describe(self) -> &'static str {
        match self {
            VolumeError::NotFound => "not found",
            VolumeError::NotReady => "medium not ready",
            VolumeError::BadFormat => "no recognisable filesystem",
            VolumeError::ReadFailed => "read failed",
            VolumeError::WriteFailed => "write failed",
            VolumeError::NoSpace => "no space left",
            VolumeError::InvalidName => "invalid name",
            VolumeError::Unsupported => "operation not supported",
            VolumeError::DeviceError => "device error",
            VolumeError::NotMounted => "volume not mounted",
            VolumeError::AlreadyMounted => "volume already mounted",
            VolumeError::TooManyOpenFiles => "too many open files",
        }
    }

    /// Stable numeric code, printed alongside the description.
    pub fn code(self) -> u8 {
        match self {
            VolumeError::NotFound => 1,
            VolumeError::NotReady => 2,
            VolumeError::BadFormat => 3,
            VolumeError::ReadFailed => 4,
            VolumeError::WriteFailed => 5,
            VolumeError::NoSpace => 6,
            VolumeError::InvalidName => 7,
            VolumeError::Unsupported => 8,
            VolumeError::DeviceError => 9,
            VolumeError::NotMounted => 10,
            VolumeError::AlreadyMounted => 11,
            VolumeError::TooManyOpenFiles => 12,
        }
    }
}

/// Capacity report for a mounted volume, in allocation clusters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeSpace {
    /// Number of FAT entries. The first two do not map to data clusters.
    pub total_clusters: u32,
    pub free_clusters: u32,
    /// Sectors per allocation cluster.
    pub cluster_sectors: u32,
}

impl VolumeSpace {
    /// Usable capacity in KiB, assuming 512-byte sectors.
    pub fn total_kib(self) -> u64 {
        u64::from(self.total_clusters.saturating_sub(2)) * u64::from(self.cluster_sectors) / 2
    }

    /// Free capacity in KiB, assuming 512-byte sectors.
    pub fn free_kib(self) -> u64 {
        u64::from(self.free_clusters) * u64::from(self.cluster_sectors) / 2
    }
}

/// One entry from a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Short (8.3) file name.
    pub name: String<16>,
    pub is_directory: bool,
    pub is_read_only: bool,
    pub size: u32,
}

impl EntryInfo {
    /// Attribute classification shown in listings.
    pub fn attribute(&self) -> &'static str {
        if self.is_directory {
            "directory"
        } else if self.is_read_only {
            "read only file"
        } else {
            "writable file"
        }
    }
}

/// A mountable storage volume holding the log filesystem.
///
/// Implementations wrap one physical medium (an SD card in the firmware, an
/// in-memory filesystem in the tests). All methods are fallible; the caller
/// decides how failures surface to the operator.
pub trait VolumeService {
    /// Handle for an open file. Only valid until passed back to
    /// [`VolumeService::close`].
    type File;

    /// Makes the filesystem available. Mounting twice is an error.
    fn mount(&mut self) -> Result<(), VolumeError>;

    /// Releases the filesystem and forgets any cached media state, so the
    /// medium can be swapped before the next mount.
    fn unmount(&mut self) -> Result<(), VolumeError>;

    fn is_mounted(&self) -> bool;

    /// Creates a fresh filesystem on the medium.
    fn format(&mut self) -> Result<(), VolumeError>;

    /// Reports total and free space.
    fn free_space(&mut self) -> Result<VolumeSpace, VolumeError>;

    /// Opens `name` for writing, truncating any previous content.
    fn open_write(&mut self, name: &str) -> Result<Self::File, VolumeError>;

    /// Opens `name` for reading.
    fn open_read(&mut self, name: &str) -> Result<Self::File, VolumeError>;

    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), VolumeError>;

    /// Reads up to `buf.len()` bytes, returning how many were read. Zero
    /// means end of file.
    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, VolumeError>;

    fn close(&mut self, file: Self::File) -> Result<(), VolumeError>;

    /// Calls `sink` once per entry in `path`. An empty `path` lists the
    /// root directory.
    fn list_dir(
        &mut self,
        path: &str,
        sink: &mut dyn FnMut(&EntryInfo),
    ) -> Result<(), VolumeError>;
}

/// How many volumes the appliance can address.
pub const MAX_VOLUMES: usize = 2;

/// Name-indexed registry of volumes.
///
/// The first registered volume is the default: it backs capture sessions
/// and any volume command issued without an explicit name.
pub struct VolumeSet<V> {
    entries: Vec<(&'static str, V), MAX_VOLUMES>,
}

impl<V> VolumeSet<V> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a volume under `name`. Fails (returning the volume) once the
    /// registry is full.
    pub fn register(&mut self, name: &'static str, volume: V) -> Result<(), V> {
        self.entries.push((name, volume)).map_err(|(_, v)| v)
    }

    /// Looks up a volume by name, or the default volume when `name` is
    /// `None`.
    pub fn resolve(&mut self, name: Option<&str>) -> Option<(&'static str, &mut V)> {
        match name {
            Some(wanted) => self
                .entries
                .iter_mut()
                .find(|(n, _)| *n == wanted)
                .map(|(n, v)| (*n, v)),
            None => self.entries.first_mut().map(|(n, v)| (*n, v)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for VolumeSet<V> {
    fn default() -> Self {
        Self::new()
    }
}
