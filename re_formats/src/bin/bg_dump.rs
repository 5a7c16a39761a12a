//! Dump room backgrounds from ROOMCUT.BIN or BSS files as raw RGBA8 images.
//! Each background becomes `<name>.rgba` (320x240) plus `<name>.mask` when the
//! room carries a mask image.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{debug, warn};
use re_formats::{AdtOptions, BssFile, BssLayout, CameraView, RoomCutArchive};
use serde::Serialize;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(about = "Decode room backgrounds to raw RGBA8 images", version)]
struct Args {
    /// ROOMCUT.BIN archive of ADT backgrounds
    #[arg(long, value_name = "PATH", conflicts_with_all = ["bss", "bss_root"])]
    roomcut: Option<PathBuf>,

    /// BSS file to decode (may be passed multiple times)
    #[arg(long = "bss", value_name = "PATH", conflicts_with = "bss_root")]
    bss: Vec<PathBuf>,

    /// Directory scanned recursively for *.bss files
    #[arg(long = "bss-root", value_name = "DIR")]
    bss_root: Option<PathBuf>,

    /// Section size of the BSS files
    #[arg(long, value_enum, default_value_t = LayoutArg::Re2)]
    layout: LayoutArg,

    /// Destination directory for decoded images
    #[arg(long, value_name = "DIR", default_value = "backgrounds")]
    dest: PathBuf,

    /// Stop after this many backgrounds
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Overwrite existing files instead of skipping them
    #[arg(long)]
    overwrite: bool,

    /// Decode streams that run short by padding them with zero bits
    #[arg(long)]
    lenient: bool,

    /// Write a JSON description of every output to this file
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Re1,
    Re2,
}

impl From<LayoutArg> for BssLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Re1 => BssLayout::Re1,
            LayoutArg::Re2 => BssLayout::Re2,
        }
    }
}

#[derive(Debug, Serialize)]
struct Manifest {
    source: String,
    layout: Option<BssLayout>,
    outputs: Vec<OutputRecord>,
    skipped: Vec<String>,
    failures: Vec<FailureRecord>,
}

#[derive(Debug, Serialize)]
struct OutputRecord {
    name: String,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<CameraView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    camera: Option<usize>,
    width: u32,
    height: u32,
    image: String,
    mask: Option<String>,
    mask_len: usize,
    /// Decompressed bytes for ADT, frame bytes consumed for BSS.
    stream_len: usize,
}

#[derive(Debug, Serialize)]
struct FailureRecord {
    name: String,
    error: String,
}

/// What a single decode produced, before it is written out.
struct Decoded {
    view: Option<CameraView>,
    camera: Option<usize>,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    mask: Option<Vec<u8>>,
    stream_len: usize,
}

struct Dumper {
    dest: PathBuf,
    limit: Option<usize>,
    overwrite: bool,
    manifest: Manifest,
}

impl Dumper {
    fn limit_reached(&self) -> bool {
        let attempted =
            self.manifest.outputs.len() + self.manifest.skipped.len() + self.manifest.failures.len();
        self.limit.is_some_and(|limit| attempted >= limit)
    }

    fn image_path(&self, name: &str) -> PathBuf {
        self.dest.join(format!("{name}.rgba"))
    }

    /// Run `decode` for one background unless its image already exists.
    fn dump<F>(&mut self, name: String, source: &Path, decode: F) -> Result<()>
    where
        F: FnOnce() -> Result<Decoded>,
    {
        let image_path = self.image_path(&name);
        if image_path.exists() && !self.overwrite {
            debug!("{} exists, skipping", image_path.display());
            self.manifest.skipped.push(name);
            return Ok(());
        }

        let decoded = match decode() {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("{name}: {err:#}");
                self.manifest.failures.push(FailureRecord {
                    name,
                    error: format!("{err:#}"),
                });
                return Ok(());
            }
        };

        fs::write(&image_path, &decoded.rgba)
            .with_context(|| format!("writing {}", image_path.display()))?;
        let mask = match &decoded.mask {
            Some(bytes) => {
                let mask_path = self.dest.join(format!("{name}.mask"));
                fs::write(&mask_path, bytes)
                    .with_context(|| format!("writing {}", mask_path.display()))?;
                Some(mask_path.display().to_string())
            }
            None => None,
        };

        self.manifest.outputs.push(OutputRecord {
            name,
            source: source.display().to_string(),
            view: decoded.view,
            camera: decoded.camera,
            width: decoded.width,
            height: decoded.height,
            image: image_path.display().to_string(),
            mask,
            mask_len: decoded.mask.as_ref().map_or(0, Vec::len),
            stream_len: decoded.stream_len,
        });
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    fs::create_dir_all(&args.dest)
        .with_context(|| format!("creating destination {}", args.dest.display()))?;

    let layout = BssLayout::from(args.layout);
    let mut dumper = Dumper {
        dest: args.dest.clone(),
        limit: args.limit,
        overwrite: args.overwrite,
        manifest: Manifest {
            source: String::new(),
            layout: None,
            outputs: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        },
    };

    if let Some(path) = args.roomcut.as_ref() {
        dumper.manifest.source = path.display().to_string();
        dump_roomcut(&mut dumper, path, args.lenient)?;
    } else {
        let files = resolve_bss_paths(&args)?;
        if files.is_empty() {
            bail!("no input: pass --roomcut, --bss or --bss-root");
        }
        dumper.manifest.source = match args.bss_root.as_ref() {
            Some(root) => root.display().to_string(),
            None => "command line".to_string(),
        };
        dumper.manifest.layout = Some(layout);
        for path in files {
            if dumper.limit_reached() {
                break;
            }
            dump_bss(&mut dumper, &path, layout, args.lenient)?;
        }
    }

    if let Some(path) = args.manifest.as_ref() {
        write_manifest(path, &dumper.manifest)?;
    }

    let manifest = &dumper.manifest;
    println!(
        "Decoded {} backgrounds into {} ({} skipped, {} failed)",
        manifest.outputs.len(),
        args.dest.display(),
        manifest.skipped.len(),
        manifest.failures.len()
    );

    if manifest.outputs.is_empty() && manifest.skipped.is_empty() {
        bail!("no backgrounds could be decoded");
    }
    Ok(())
}

fn dump_roomcut(dumper: &mut Dumper, path: &Path, lenient: bool) -> Result<()> {
    let archive = RoomCutArchive::open(path)?;
    let options = AdtOptions {
        allow_zero_padding: lenient,
    };

    for entry in archive.entries() {
        if entry.size == 0 {
            continue;
        }
        if dumper.limit_reached() {
            break;
        }
        let view = entry.view();
        dumper.dump(view.name(), path, || {
            let background = archive.decode_background(entry, options)?;
            Ok(Decoded {
                view: Some(view),
                camera: None,
                width: background.width,
                height: background.height,
                rgba: background.rgba,
                mask: background.mask,
                stream_len: background.decompressed_len,
            })
        })?;
    }
    Ok(())
}

fn dump_bss(dumper: &mut Dumper, path: &Path, layout: BssLayout, lenient: bool) -> Result<()> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_ascii_lowercase())
        .unwrap_or_else(|| "bss".to_string());

    let file = match BssFile::open(path, layout) {
        Ok(file) => file,
        Err(err) => {
            warn!("{}: {err:#}", path.display());
            dumper.manifest.failures.push(FailureRecord {
                name: stem,
                error: format!("{err:#}"),
            });
            return Ok(());
        }
    };

    for camera in 0..file.camera_count() {
        if dumper.limit_reached() {
            break;
        }
        let name = format!("{stem}_cam{camera:02}");
        dumper.dump(name, path, || {
            let background = file.decode_camera(camera, lenient)?;
            Ok(Decoded {
                view: None,
                camera: Some(camera),
                width: background.width,
                height: background.height,
                rgba: background.rgba,
                mask: background.mask,
                stream_len: background.bytes_consumed,
            })
        })?;
    }
    Ok(())
}

fn resolve_bss_paths(args: &Args) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !args.bss.is_empty() {
        files.extend(args.bss.iter().cloned());
    } else if let Some(root) = args.bss_root.as_ref() {
        for entry in WalkDir::new(root) {
            let entry = entry.with_context(|| format!("scanning {}", root.display()))?;
            let is_bss = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("bss"));
            if entry.file_type().is_file() && is_bss {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)
        .with_context(|| format!("writing manifest {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
