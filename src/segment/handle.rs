//! Shared memory segment handle

use std::os::fd::{AsRawFd, OwnedFd};

use memmap2::{MmapMut, MmapOptions};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::{shm_open, shm_unlink};
use nix::sys::stat::{fstat, Mode};
use nix::unistd::ftruncate;

use crate::config::{DEFAULT_PERMISSIONS, MAX_SEGMENT_NAME_LEN};
use crate::error::{Result, SeuratError};
use crate::layout::compiler::posix_name;

/// A named POSIX shared memory object mapped into this process
///
/// Exactly one handle per name may own the lifecycle (`create_or_replace`);
/// any number of non-owning handles may attach. The OS object is unlinked
/// only by the owning handle and only on explicit `close(release=true)` —
/// dropping a handle detaches the mapping but leaves the object in place.
#[derive(Debug)]
pub struct Segment {
    /// Normalized POSIX name (single leading slash)
    name: String,
    /// Mapped size in bytes
    size: usize,
    /// Whether this handle is responsible for final teardown
    owns_lifecycle: bool,
    /// Memory mapping; `None` once closed
    mmap: Option<MmapMut>,
    /// File descriptor kept alive alongside the mapping
    _fd: Option<OwnedFd>,
}

impl Segment {
    /// Create a fresh segment, destructively replacing any stale object of
    /// the same name
    ///
    /// The new object is exactly `total_size` bytes and zero-filled. The
    /// returned handle owns the lifecycle of the OS object.
    pub fn create_or_replace(name: &str, total_size: usize) -> Result<Self> {
        let name = validated_name(name)?;
        if total_size == 0 {
            return Err(SeuratError::invalid_parameter(
                "total_size",
                "Segment size must be greater than 0",
            ));
        }

        // Destructive takeover of a stale object is by contract: each run
        // starts from a fresh zero-filled segment.
        match shm_unlink(name.as_str()) {
            Ok(()) => {
                log::warn!(
                    "shared memory segment '{}' already exists, unlinking it to create a new one",
                    name
                );
            }
            Err(Errno::ENOENT) => {}
            Err(errno) => {
                return Err(SeuratError::segment_create_failed(
                    &name,
                    format!("failed to unlink stale segment: {}", errno),
                ));
            }
        }

        let fd = shm_open(
            name.as_str(),
            OFlag::O_CREAT | OFlag::O_EXCL | OFlag::O_RDWR,
            Mode::from_bits_truncate(DEFAULT_PERMISSIONS as libc::mode_t),
        )
        .map_err(|errno| {
            SeuratError::segment_create_failed(&name, format!("shm_open failed: {}", errno))
        })?;

        // Extending a fresh object zero-fills it.
        ftruncate(&fd, total_size as i64).map_err(|errno| {
            SeuratError::segment_create_failed(&name, format!("ftruncate failed: {}", errno))
        })?;

        let mmap = unsafe {
            MmapOptions::new().len(total_size).map_mut(&fd).map_err(|e| {
                SeuratError::segment_create_failed(&name, format!("mmap failed: {}", e))
            })?
        };

        log::info!("created shared memory segment '{}' ({} bytes)", name, total_size);

        Ok(Self {
            name,
            size: total_size,
            owns_lifecycle: true,
            mmap: Some(mmap),
            _fd: Some(fd),
        })
    }

    /// Attach to an existing segment by name without creating
    ///
    /// The mapped size is the object's actual size as reported by the OS,
    /// which lets bind-time checks detect a schema/segment mismatch. The
    /// returned handle never unlinks the object.
    pub fn attach(name: &str) -> Result<Self> {
        let name = validated_name(name)?;

        let fd = shm_open(name.as_str(), OFlag::O_RDWR, Mode::empty()).map_err(|errno| {
            match errno {
                Errno::ENOENT => SeuratError::segment_not_found(&name),
                other => SeuratError::from_io(
                    std::io::Error::from_raw_os_error(other as i32),
                    "Failed to open shared memory segment",
                ),
            }
        })?;

        let stat = fstat(fd.as_raw_fd()).map_err(|errno| {
            SeuratError::from_io(
                std::io::Error::from_raw_os_error(errno as i32),
                "Failed to stat shared memory segment",
            )
        })?;
        let size = stat.st_size as usize;
        if size == 0 {
            return Err(SeuratError::invalid_parameter(
                "name",
                format!("Segment '{}' has zero size", name),
            ));
        }

        let mmap = unsafe {
            MmapOptions::new()
                .len(size)
                .map_mut(&fd)
                .map_err(|e| SeuratError::from_io(e, "Failed to map shared memory segment"))?
        };

        log::info!("attached to shared memory segment '{}' ({} bytes)", name, size);

        Ok(Self {
            name,
            size,
            owns_lifecycle: false,
            mmap: Some(mmap),
            _fd: Some(fd),
        })
    }

    /// Detach the mapping; optionally destroy the underlying OS object
    ///
    /// The object is unlinked only when `release` is true and this handle
    /// owns the lifecycle. Calling `close` on an already-closed segment is
    /// a no-op. Views bound over this segment are invalid afterward.
    pub fn close(&mut self, release: bool) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }

        // Dropping the mapping and fd detaches this process.
        self.mmap = None;
        self._fd = None;

        if release && self.owns_lifecycle {
            match shm_unlink(self.name.as_str()) {
                Ok(()) => {
                    log::info!("unlinked shared memory segment '{}'", self.name);
                }
                // Already gone (e.g. replaced by another creator): nothing to release.
                Err(Errno::ENOENT) => {}
                Err(errno) => {
                    return Err(SeuratError::from_io(
                        std::io::Error::from_raw_os_error(errno as i32),
                        "Failed to unlink shared memory segment",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Whether this handle has been closed
    pub fn is_closed(&self) -> bool {
        self.mmap.is_none()
    }

    /// Normalized POSIX name of the segment
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mapped size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this handle owns the object's lifecycle
    pub fn owns_lifecycle(&self) -> bool {
        self.owns_lifecycle
    }

    /// Raw byte view of the segment
    pub fn as_slice(&self) -> Result<&[u8]> {
        self.mmap
            .as_ref()
            .map(|m| &m[..])
            .ok_or_else(|| closed_error(&self.name))
    }

    /// Mutable raw byte view of the segment
    pub fn as_mut_slice(&mut self) -> Result<&mut [u8]> {
        match self.mmap.as_mut() {
            Some(m) => Ok(&mut m[..]),
            None => Err(closed_error(&self.name)),
        }
    }

    /// Base pointer of the mapping
    ///
    /// Valid only while this handle remains open; callers derive views
    /// from it and must not use them past `close`.
    pub(crate) fn base_ptr(&self) -> Result<*mut u8> {
        self.mmap
            .as_ref()
            .map(|m| m.as_ptr() as *mut u8)
            .ok_or_else(|| closed_error(&self.name))
    }
}

impl Drop for Segment {
    fn drop(&mut self) {
        // The mapping and fd detach automatically. Unlinking is explicit
        // only; an owning handle that relies on process exit leaves the OS
        // object behind.
        if !self.is_closed() && self.owns_lifecycle {
            log::warn!(
                "owning segment '{}' dropped without close(); OS object left in place",
                self.name
            );
        }
    }
}

/// Unlink a named segment without attaching to it
///
/// Fails with `SegmentNotFound` if no object of that name exists.
pub fn unlink(name: &str) -> Result<()> {
    let name = validated_name(name)?;
    match shm_unlink(name.as_str()) {
        Ok(()) => Ok(()),
        Err(Errno::ENOENT) => Err(SeuratError::segment_not_found(&name)),
        Err(errno) => Err(SeuratError::from_io(
            std::io::Error::from_raw_os_error(errno as i32),
            "Failed to unlink shared memory segment",
        )),
    }
}

fn validated_name(name: &str) -> Result<String> {
    let bare = name.strip_prefix('/').unwrap_or(name);
    if bare.is_empty() {
        return Err(SeuratError::invalid_parameter(
            "name",
            "Segment name cannot be empty",
        ));
    }
    if bare.contains('/') {
        return Err(SeuratError::invalid_parameter(
            "name",
            "Segment name cannot contain '/'",
        ));
    }
    if bare.len() > MAX_SEGMENT_NAME_LEN {
        return Err(SeuratError::invalid_parameter(
            "name",
            "Segment name too long",
        ));
    }
    Ok(posix_name(name))
}

fn closed_error(name: &str) -> SeuratError {
    SeuratError::invalid_parameter("segment", format!("Segment '{}' is closed", name))
}
