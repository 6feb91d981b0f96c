use chrono::{DateTime, Local};
use notes_search::{slugify, NoteEntry, Timestamp, DEFAULT_TITLE};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::note::{render_note, NoteTemplate};

/// File extensions (lowercase) recognised as notes.
pub const NOTE_EXTENSIONS: &[&str] = &["md", "txt"];

/// Flat directory of dated note files.
#[derive(Clone, Debug)]
pub struct NotesStore {
    root: PathBuf,
}

impl NotesStore {
    /// Open the notes directory at `root`, creating it (and parents) if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StoreError::from_io(&root, e))?;
        log::debug!("Opened notes directory {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot every note in the directory, sorted by file name so ranking
    /// ties resolve deterministically.
    ///
    /// Only regular files directly inside the directory with a note extension
    /// are listed. Times the platform cannot report are left as `None`.
    pub fn entries(&self) -> Result<Vec<NoteEntry>> {
        let dir = fs::read_dir(&self.root).map_err(|e| StoreError::from_io(&self.root, e))?;

        let mut notes = Vec::new();
        for entry in dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry in {}: {e}", self.root.display());
                    continue;
                }
            };
            let path = entry.path();
            if !Self::is_note_file(&path) {
                continue;
            }

            // Follows symlinks, so linked notes are listed like regular ones.
            let meta = match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => meta,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                log::debug!("Skipping non UTF-8 file name {}", path.display());
                continue;
            };

            notes.push(NoteEntry::new(
                name,
                meta.created().ok().map(Timestamp::from),
                meta.modified().ok().map(Timestamp::from),
            ));
        }

        notes.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!("Found {} notes in {}", notes.len(), self.root.display());
        Ok(notes)
    }

    /// Create `<date>-<slug>.md` for `title`, adding `-1`, `-2`, ... on collision.
    ///
    /// An empty title (or one with no slug-able characters) falls back to
    /// `note`. Returns the path of the written file.
    pub fn create_note(
        &self,
        title: &str,
        tags: &[String],
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let title = if title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            title
        };
        let slug = match slugify(title) {
            slug if slug.is_empty() => DEFAULT_TITLE.to_string(),
            slug => slug,
        };
        let stem = format!("{}-{slug}", now.format("%Y-%m-%d"));

        let (path, mut file) = self.create_unique(&stem)?;
        let content = render_note(&NoteTemplate {
            title,
            tags,
            created: now,
        });
        file.write_all(content.as_bytes())
            .map_err(|e| StoreError::from_io(&path, e))?;

        log::info!("Created note {}", path.display());
        Ok(path)
    }

    /// Read the full content of the note called `name`.
    pub fn read_note(&self, name: &str) -> Result<String> {
        let path = self.note_path(name)?;
        fs::read_to_string(&path).map_err(|e| StoreError::from_io(&path, e))
    }

    /// Resolve `name` inside the notes directory, refusing anything that
    /// would point elsewhere.
    pub fn note_path(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(name)),
            _ => Err(StoreError::InvalidName(name.to_string())),
        }
    }

    fn create_unique(&self, stem: &str) -> Result<(PathBuf, File)> {
        let mut suffix = 0usize;
        loop {
            let file_name = if suffix == 0 {
                format!("{stem}.md")
            } else {
                format!("{stem}-{suffix}.md")
            };
            let path = self.root.join(file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    log::debug!("{} exists, trying next suffix", path.display());
                    suffix += 1;
                }
                Err(e) => return Err(StoreError::from_io(&path, e)),
            }
        }
    }

    fn is_note_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                NOTE_EXTENSIONS
                    .iter()
                    .any(|candidate| ext.eq_ignore_ascii_case(candidate))
            })
            .unwrap_or(false)
    }
}
