use core::fmt::Write;

use embedded_sdmmc::{
    Block, BlockCount, BlockDevice, BlockIdx, Mode, RawDirectory, RawFile, RawVolume, TimeSource,
    Timestamp, VolumeIdx, VolumeManager,
};
use heapless::String;
use motlog_core::{EntryInfo, VolumeError, VolumeService, VolumeSpace};

use crate::{info, warn};

pub type AppCard = motlog_bsp::Card<'static>;

/// `Copy` view of the card, so the volume manager and the free-space
/// scanner can address the same medium.
#[derive(Clone, Copy)]
pub struct SharedCard(&'static AppCard);

impl BlockDevice for SharedCard {
    type Error = <AppCard as BlockDevice>::Error;

    fn read(&self, blocks: &mut [Block], start_block_idx: BlockIdx) -> Result<(), Self::Error> {
        self.0.read(blocks, start_block_idx)
    }

    fn write(&self, blocks: &[Block], start_block_idx: BlockIdx) -> Result<(), Self::Error> {
        self.0.write(blocks, start_block_idx)
    }

    fn num_blocks(&self) -> Result<BlockCount, Self::Error> {
        self.0.num_blocks()
    }
}

/// Stamps files from the global clock, or with a fixed 2000-01-01 before
/// the operator has run `setrtc`.
pub struct RtcTimeSource;

impl TimeSource for RtcTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        match crate::CLOCK.now() {
            Some(date) => Timestamp {
                year_since_1970: (date.year() - 1970) as u8,
                zero_indexed_month: date.month() as u8 - 1,
                zero_indexed_day: date.day() - 1,
                hours: date.hour(),
                minutes: date.minute(),
                seconds: date.second(),
            },
            None => Timestamp {
                year_since_1970: 30,
                zero_indexed_month: 0,
                zero_indexed_day: 0,
                hours: 0,
                minutes: 0,
                seconds: 0,
            },
        }
    }
}

struct MountedVolume {
    volume: RawVolume,
    root: RawDirectory,
}

/// FAT geometry pulled from the BPB, for the free-space report.
struct FatLayout {
    fat_start: u32,
    cluster_count: u32,
    sectors_per_cluster: u32,
    fat32: bool,
    fsinfo_sector: Option<u32>,
}

const FSINFO_LEAD_SIG: u32 = 0x4161_5252;
const FSINFO_STRUC_SIG: u32 = 0x6141_7272;
/// Offset of partition 0's starting LBA in the MBR.
const MBR_PARTITION_START: usize = 446 + 8;

/// The SD card as a mountable volume.
///
/// File access goes through the [`VolumeManager`]; the free-space report
/// reads the FAT structures directly off the card, which the manager does
/// not expose.
pub struct SdVolume {
    card: &'static AppCard,
    mgr: VolumeManager<SharedCard, RtcTimeSource>,
    mounted: Option<MountedVolume>,
}

impl SdVolume {
    pub fn new(card: &'static AppCard) -> Self {
        Self {
            card,
            mgr: VolumeManager::new(SharedCard(card), RtcTimeSource),
            mounted: None,
        }
    }

    fn read_block(&self, lba: u32) -> Result<Block, VolumeError> {
        let mut blocks = [Block::new()];
        self.card
            .read(&mut blocks, BlockIdx(lba))
            .map_err(|_| VolumeError::ReadFailed)?;
        let [block] = blocks;
        Ok(block)
    }

    fn read_layout(&self) -> Result<FatLayout, VolumeError> {
        let mbr = self.read_block(0)?;
        if mbr.contents[510] != 0x55 || mbr.contents[511] != 0xAA {
            return Err(VolumeError::BadFormat);
        }
        let part_start = le_u32(&mbr.contents, MBR_PARTITION_START);

        let bpb = self.read_block(part_start)?;
        let b = &bpb.contents;
        let sectors_per_cluster = u32::from(b[13]);
        let reserved = u32::from(le_u16(b, 14));
        let num_fats = u32::from(b[16]);
        let root_entries = u32::from(le_u16(b, 17));
        let total_sectors = match le_u16(b, 19) {
            0 => le_u32(b, 32),
            n => u32::from(n),
        };
        let fat_size = match le_u16(b, 22) {
            0 => le_u32(b, 36),
            n => u32::from(n),
        };
        if sectors_per_cluster == 0 || reserved == 0 || fat_size == 0 {
            return Err(VolumeError::BadFormat);
        }

        let root_dir_sectors = (root_entries * 32).div_ceil(512);
        let data_start = reserved + num_fats * fat_size + root_dir_sectors;
        let data_sectors = total_sectors.saturating_sub(data_start);
        let cluster_count = data_sectors / sectors_per_cluster;
        if cluster_count < 4085 {
            // FAT12, entries straddle byte boundaries.
            return Err(VolumeError::Unsupported);
        }
        let fat32 = cluster_count >= 65525;

        let fsinfo_sector = if fat32 {
            match le_u16(b, 48) {
                0 | 0xFFFF => None,
                n => Some(part_start + u32::from(n)),
            }
        } else {
            None
        };

        Ok(FatLayout {
            fat_start: part_start + reserved,
            cluster_count,
            sectors_per_cluster,
            fat32,
            fsinfo_sector,
        })
    }

    /// Free-cluster count from the FAT32 FSInfo sector, when it carries a
    /// plausible value.
    fn read_fsinfo(&self, layout: &FatLayout) -> Option<u32> {
        let sector = layout.fsinfo_sector?;
        let block = self.read_block(sector).ok()?;
        let b = &block.contents;
        if le_u32(b, 0) != FSINFO_LEAD_SIG || le_u32(b, 484) != FSINFO_STRUC_SIG {
            return None;
        }
        let free = le_u32(b, 488);
        (free != 0xFFFF_FFFF && free <= layout.cluster_count).then_some(free)
    }

    /// Counts free clusters by walking the FAT sector by sector.
    fn scan_fat(&self, layout: &FatLayout) -> Result<u32, VolumeError> {
        let entry_bytes: u32 = if layout.fat32 { 4 } else { 2 };
        let entries_per_sector = 512 / entry_bytes;
        let total_entries = layout.cluster_count + 2;
        let fat_sectors =
            (u64::from(total_entries) * u64::from(entry_bytes)).div_ceil(512) as u32;

        let mut free = 0u32;
        for s in 0..fat_sectors {
            let block = self.read_block(layout.fat_start + s)?;
            let first = s * entries_per_sector;
            for i in 0..entries_per_sector {
                let idx = first + i;
                if idx < 2 || idx >= total_entries {
                    continue;
                }
                let off = (i * entry_bytes) as usize;
                let empty = if layout.fat32 {
                    le_u32(&block.contents, off) & 0x0FFF_FFFF == 0
                } else {
                    le_u16(&block.contents, off) == 0
                };
                if empty {
                    free += 1;
                }
            }
        }
        Ok(free)
    }
}

impl VolumeService for SdVolume {
    type File = RawFile;

    fn mount(&mut self) -> Result<(), VolumeError> {
        if self.mounted.is_some() {
            return Err(VolumeError::AlreadyMounted);
        }
        let size = self.card.num_bytes().map_err(|_| VolumeError::NotReady)?;
        info!("SD card size: {} bytes", size);

        let volume = self
            .mgr
            .open_raw_volume(VolumeIdx(0))
            .map_err(map_sdmmc)?;
        let root = match self.mgr.open_root_dir(volume) {
            Ok(root) => root,
            Err(err) => {
                let _ = self.mgr.close_volume(volume);
                return Err(map_sdmmc(err));
            }
        };
        self.mounted = Some(MountedVolume { volume, root });
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), VolumeError> {
        let Some(mounted) = self.mounted.take() else {
            return Err(VolumeError::NotMounted);
        };
        let dir_result = self.mgr.close_dir(mounted.root);
        let vol_result = self.mgr.close_volume(mounted.volume);
        // Next mount re-runs card init, in case the operator swaps cards.
        self.card.mark_card_uninit();
        dir_result.map_err(map_sdmmc)?;
        vol_result.map_err(map_sdmmc)?;
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    fn format(&mut self) -> Result<(), VolumeError> {
        // The filesystem layer cannot build a fresh FAT; cards are
        // formatted off the appliance.
        Err(VolumeError::Unsupported)
    }

    fn free_space(&mut self) -> Result<VolumeSpace, VolumeError> {
        if self.mounted.is_none() {
            return Err(VolumeError::NotMounted);
        }
        let layout = self.read_layout()?;
        let free_clusters = match self.read_fsinfo(&layout) {
            Some(free) => free,
            None => {
                info!("No usable FSInfo, scanning the FAT");
                self.scan_fat(&layout)?
            }
        };
        Ok(VolumeSpace {
            total_clusters: layout.cluster_count + 2,
            free_clusters,
            cluster_sectors: layout.sectors_per_cluster,
        })
    }

    fn open_write(&mut self, name: &str) -> Result<Self::File, VolumeError> {
        let mounted = self.mounted.as_ref().ok_or(VolumeError::NotMounted)?;
        self.mgr
            .open_file_in_dir(mounted.root, name, Mode::ReadWriteCreateOrTruncate)
            .map_err(map_sdmmc)
    }

    fn open_read(&mut self, name: &str) -> Result<Self::File, VolumeError> {
        let mounted = self.mounted.as_ref().ok_or(VolumeError::NotMounted)?;
        self.mgr
            .open_file_in_dir(mounted.root, name, Mode::ReadOnly)
            .map_err(map_sdmmc)
    }

    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), VolumeError> {
        self.mgr.write(*file, data).map_err(map_sdmmc)
    }

    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, VolumeError> {
        self.mgr.read(*file, buf).map_err(map_sdmmc)
    }

    fn close(&mut self, file: Self::File) -> Result<(), VolumeError> {
        self.mgr.close_file(file).map_err(map_sdmmc)
    }

    fn list_dir(
        &mut self,
        path: &str,
        sink: &mut dyn FnMut(&EntryInfo),
    ) -> Result<(), VolumeError> {
        let mounted = self.mounted.as_ref().ok_or(VolumeError::NotMounted)?;
        let opened = if path.is_empty() {
            None
        } else {
            Some(self.mgr.open_dir(mounted.root, path).map_err(map_sdmmc)?)
        };
        let target = opened.unwrap_or(mounted.root);

        let result = self.mgr.iterate_dir(target, |entry| {
            if entry.attributes.is_volume() {
                return;
            }
            let mut name: String<16> = String::new();
            let _ = write!(name, "{}", entry.name);
            sink(&EntryInfo {
                name,
                is_directory: entry.attributes.is_directory(),
                is_read_only: entry.attributes.is_read_only(),
                size: entry.size,
            });
        });
        if let Some(dir) = opened {
            let _ = self.mgr.close_dir(dir);
        }
        result.map_err(map_sdmmc)
    }
}

fn map_sdmmc<E>(err: embedded_sdmmc::Error<E>) -> VolumeError {
    let mapped = match err {
        embedded_sdmmc::Error::DeviceError(_) => VolumeError::DeviceError,
        embedded_sdmmc::Error::FormatError(_) => VolumeError::BadFormat,
        embedded_sdmmc::Error::NoSuchVolume => VolumeError::BadFormat,
        embedded_sdmmc::Error::FilenameError(_) => VolumeError::InvalidName,
        embedded_sdmmc::Error::TooManyOpenVolumes
        | embedded_sdmmc::Error::TooManyOpenDirs
        | embedded_sdmmc::Error::TooManyOpenFiles => VolumeError::TooManyOpenFiles,
        embedded_sdmmc::Error::NotFound => VolumeError::NotFound,
        embedded_sdmmc::Error::DiskFull => VolumeError::NoSpace,
        embedded_sdmmc::Error::ReadOnly => VolumeError::WriteFailed,
        embedded_sdmmc::Error::Unsupported => VolumeError::Unsupported,
        _ => VolumeError::DeviceError,
    };
    warn!("Storage error: {} ({})", mapped.describe(), mapped.code());
    mapped
}

fn le_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
