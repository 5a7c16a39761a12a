use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail, ensure};
use byteorder::{ByteOrder, LittleEndian};
use memmap2::{Mmap, MmapOptions};
use serde::Serialize;

use crate::adt::{AdtBackground, AdtOptions, decode_adt_background_with};

pub const ROOMS_PER_STAGE: u32 = 32;
pub const CAMERAS_PER_ROOM: u32 = 16;
const ENTRIES_PER_STAGE: usize = (ROOMS_PER_STAGE * CAMERAS_PER_ROOM) as usize;

/// Stage, room and camera that select one background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CameraView {
    pub stage: u32,
    pub room: u32,
    pub camera: u32,
}

impl CameraView {
    pub fn new(stage: u32, room: u32, camera: u32) -> Result<Self> {
        ensure!(stage >= 1, "stage numbers start at 1");
        ensure!(
            room < ROOMS_PER_STAGE,
            "room {room} out of range (max {})",
            ROOMS_PER_STAGE - 1
        );
        ensure!(
            camera < CAMERAS_PER_ROOM,
            "camera {camera} out of range (max {})",
            CAMERAS_PER_ROOM - 1
        );
        Ok(CameraView {
            stage,
            room,
            camera,
        })
    }

    pub fn from_index(index: usize) -> Self {
        let within = index % ENTRIES_PER_STAGE;
        CameraView {
            stage: (index / ENTRIES_PER_STAGE) as u32 + 1,
            room: within as u32 / CAMERAS_PER_ROOM,
            camera: within as u32 % CAMERAS_PER_ROOM,
        }
    }

    pub fn entry_index(&self) -> usize {
        (self.stage as usize - 1) * ENTRIES_PER_STAGE
            + (self.room * CAMERAS_PER_ROOM + self.camera) as usize
    }

    /// File stem used when dumping, e.g. `room10a_cam03`.
    pub fn name(&self) -> String {
        format!(
            "room{}{:02x}_cam{:02}",
            self.stage, self.room, self.camera
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomCutEntry {
    pub index: usize,
    pub offset: usize,
    pub size: usize,
}

impl RoomCutEntry {
    pub fn data_range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }

    pub fn view(&self) -> CameraView {
        CameraView::from_index(self.index)
    }
}

/// `ROOMCUT.BIN`: every ADT background of the game behind one offset table.
#[derive(Debug)]
pub struct RoomCutArchive {
    path: PathBuf,
    mmap: Mmap,
    entries: Vec<RoomCutEntry>,
}

impl RoomCutArchive {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = File::open(&path_buf)
            .with_context(|| format!("opening ROOMCUT archive at {}", path_buf.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("reading metadata for {}", path_buf.display()))?
            .len();
        ensure!(len > 0, "ROOMCUT archive {} is empty", path_buf.display());
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .with_context(|| format!("memory-mapping ROOMCUT archive {}", path_buf.display()))?;

        let entries = parse_entries(&mmap)
            .with_context(|| format!("parsing ROOMCUT archive {}", path_buf.display()))?;

        Ok(RoomCutArchive {
            path: path_buf,
            mmap,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[RoomCutEntry] {
        &self.entries
    }

    pub fn find(&self, stage: u32, room: u32, camera: u32) -> Result<&RoomCutEntry> {
        let view = CameraView::new(stage, room, camera)?;
        let index = view.entry_index();
        self.entries.get(index).ok_or_else(|| {
            anyhow!(
                "{} has no entry {index} ({} entries)",
                self.path.display(),
                self.entries.len()
            )
        })
    }

    pub fn entry_bytes(&self, entry: &RoomCutEntry) -> Result<&[u8]> {
        ensure!(
            entry.size > 0,
            "ROOMCUT entry {} ({}) is empty",
            entry.index,
            entry.view().name()
        );
        self.mmap
            .get(entry.data_range())
            .ok_or_else(|| anyhow!("ROOMCUT entry {} lies outside the archive", entry.index))
    }

    pub fn decode_background(
        &self,
        entry: &RoomCutEntry,
        options: AdtOptions,
    ) -> Result<AdtBackground> {
        let bytes = self.entry_bytes(entry)?;
        decode_adt_background_with(bytes, options)
            .with_context(|| format!("decoding ROOMCUT entry {}", entry.index))
    }
}

/// Read the offset table. The first offset also gives the table size.
pub fn parse_entries(data: &[u8]) -> Result<Vec<RoomCutEntry>> {
    ensure!(
        data.len() >= 4,
        "ROOMCUT archive is too small to contain an offset table"
    );

    let first = LittleEndian::read_u32(&data[0..4]) as usize;
    ensure!(
        first >= 4 && first % 4 == 0,
        "ROOMCUT table size {first} is not a positive multiple of 4"
    );
    ensure!(
        first <= data.len(),
        "ROOMCUT table of {first} bytes exceeds the {}-byte archive",
        data.len()
    );

    let count = first / 4;
    let offsets: Vec<usize> = data[..first]
        .chunks_exact(4)
        .map(|raw| LittleEndian::read_u32(raw) as usize)
        .collect();

    let mut entries = Vec::with_capacity(count);
    for (index, &offset) in offsets.iter().enumerate() {
        let end = offsets.get(index + 1).copied().unwrap_or(data.len());
        if offset < first || offset > data.len() {
            bail!("ROOMCUT entry {index} offset {offset} outside the data region");
        }
        ensure!(
            end >= offset,
            "ROOMCUT entry {index} overlaps the next entry ({offset} > {end})"
        );
        entries.push(RoomCutEntry {
            index,
            offset,
            size: end - offset,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn archive_bytes(payloads: &[&str]) -> Vec<u8> {
        let table_len = payloads.len() * 4;
        let mut data = Vec::new();
        let mut offset = table_len;
        for payload in payloads {
            data.extend_from_slice(&(offset as u32).to_le_bytes());
            offset += payload.len();
        }
        for payload in payloads {
            data.extend_from_slice(payload.as_bytes());
        }
        data
    }

    #[test]
    fn camera_views_map_to_entry_indices() {
        let view = CameraView::new(1, 0, 0).unwrap();
        assert_eq!(view.entry_index(), 0);
        let view = CameraView::new(2, 3, 5).unwrap();
        assert_eq!(view.entry_index(), 512 + 48 + 5);
        assert_eq!(CameraView::from_index(565), view);
        assert_eq!(view.name(), "room203_cam05");
        assert_eq!(CameraView::new(1, 10, 3).unwrap().name(), "room10a_cam03");

        assert!(CameraView::new(0, 0, 0).is_err());
        assert!(CameraView::new(1, 32, 0).is_err());
        assert!(CameraView::new(1, 0, 16).is_err());
    }

    #[test]
    fn parses_offsets_with_last_entry_to_end_of_file() {
        let data = archive_bytes(&["ABCD", "", "xyz12"]);
        let entries = parse_entries(&data).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].data_range(), 12..16);
        assert_eq!(entries[1].size, 0);
        assert_eq!(entries[2].data_range(), 16..21);
    }

    #[test]
    fn rejects_overlapping_and_stray_offsets() {
        let mut data = archive_bytes(&["ABCD", "EFGH"]);
        data[4..8].copy_from_slice(&20u32.to_le_bytes());
        let err = parse_entries(&data).unwrap_err();
        assert!(err.to_string().contains("outside the data region"));

        let mut data = archive_bytes(&["ABCD", "EFGH", "IJ"]);
        data[4..8].copy_from_slice(&21u32.to_le_bytes());
        let err = parse_entries(&data).unwrap_err();
        assert!(err.to_string().contains("overlaps"));

        assert!(parse_entries(&[6, 0, 0, 0, 0, 0]).is_err());
        assert!(parse_entries(&[64, 0, 0, 0]).is_err());
        assert!(parse_entries(&[0, 0]).is_err());
    }

    #[test]
    fn opens_archive_and_reads_entries() {
        let data = archive_bytes(&["first", "", "third!"]);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();

        let archive = RoomCutArchive::open(file.path()).unwrap();
        assert_eq!(archive.entries().len(), 3);

        let entry = *archive.find(1, 0, 2).unwrap();
        assert_eq!(archive.entry_bytes(&entry).unwrap(), b"third!");

        let empty = *archive.find(1, 0, 1).unwrap();
        let err = archive.entry_bytes(&empty).unwrap_err();
        assert!(err.to_string().contains("empty"));

        assert!(archive.find(1, 0, 3).is_err());
    }

    #[test]
    fn undecodable_entry_reports_its_index() {
        let data = archive_bytes(&["MAGI"]);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();

        let archive = RoomCutArchive::open(file.path()).unwrap();
        let entry = archive.entries()[0];
        let err = archive
            .decode_background(&entry, AdtOptions::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("ROOMCUT entry 0"));
    }
}
