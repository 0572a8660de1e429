use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::FrameNumber,
    foundation::error::{ReelError, ReelResult},
};

/// File naming scheme of an exported image sequence, e.g. `Sequence 01_frame_007.webp`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FramePattern {
    /// Everything before the frame digits.
    pub prefix: String,
    /// Zero-padded width of the frame number.
    #[serde(default = "default_digits")]
    pub digits: usize,
    /// Suffix including the dot, e.g. `.webp`.
    pub extension: String,
}

fn default_digits() -> usize {
    3
}

impl FramePattern {
    /// Pattern `{prefix}{frame:0digits}{extension}`.
    pub fn new(prefix: impl Into<String>, digits: usize, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            digits,
            extension: extension.into(),
        }
    }

    /// File name of `frame` under this pattern.
    pub fn file_name(&self, frame: FrameNumber) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            frame.0,
            self.extension,
            width = self.digits
        )
    }

    /// Frame number encoded in `name`, if it follows this pattern exactly.
    pub fn parse_index(&self, name: &str) -> Option<FrameNumber> {
        let digits = name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.extension.as_str())?;
        if digits.len() != self.digits || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().map(FrameNumber)
    }
}

/// Complete, stable mapping from frame number to a loadable relative path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameManifest {
    paths: Vec<String>,
}

impl FrameManifest {
    /// Paths for frames `1..=paths.len()`, in order.
    pub fn from_paths(paths: Vec<String>) -> ReelResult<Self> {
        if paths.is_empty() {
            return Err(ReelError::validation("frame manifest must not be empty"));
        }
        let paths = paths
            .iter()
            .map(|p| normalize_rel_path(p))
            .collect::<ReelResult<Vec<_>>>()?;
        Ok(Self { paths })
    }

    /// Manifest naming frames `1..=total_frames` after `pattern`, without touching disk.
    pub fn from_pattern(pattern: &FramePattern, total_frames: u32) -> ReelResult<Self> {
        Self::from_paths(
            (1..=total_frames)
                .map(|f| pattern.file_name(FrameNumber(f)))
                .collect(),
        )
    }

    /// Scan `dir` for files matching `pattern`; every frame in `1..=total_frames` must exist.
    pub fn scan_dir(dir: &Path, pattern: &FramePattern, total_frames: u32) -> ReelResult<Self> {
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read frame directory '{}'", dir.display()))?;

        let mut found = vec![None::<String>; total_frames as usize];
        for entry in rd.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(frame) = pattern.parse_index(name) else {
                continue;
            };
            if frame.0 == 0 || frame.0 > total_frames {
                tracing::debug!(file = name, "frame outside configured range, skipped");
                continue;
            }
            found[(frame.0 - 1) as usize] = Some(name.to_string());
        }

        let mut paths = Vec::with_capacity(found.len());
        for (i, p) in found.into_iter().enumerate() {
            let p = p.ok_or_else(|| {
                ReelError::validation(format!(
                    "frame {} ('{}') is missing from '{}'",
                    i + 1,
                    pattern.file_name(FrameNumber(i as u32 + 1)),
                    dir.display()
                ))
            })?;
            paths.push(p);
        }
        Self::from_paths(paths)
    }

    /// Number of frames (N).
    pub fn total_frames(&self) -> u32 {
        self.paths.len() as u32
    }

    /// Relative path of `frame`; `None` outside `1..=N`.
    pub fn path(&self, frame: FrameNumber) -> Option<&str> {
        let i = frame.0.checked_sub(1)? as usize;
        self.paths.get(i).map(String::as_str)
    }

    /// `(frame, path)` pairs for frames in `range`, clipped to the manifest.
    pub fn entries(
        &self,
        range: std::ops::RangeInclusive<u32>,
    ) -> impl Iterator<Item = (FrameNumber, &str)> + '_ {
        let start = (*range.start()).max(1);
        let end = (*range.end()).min(self.total_frames());
        (start..=end).filter_map(move |f| self.path(FrameNumber(f)).map(|p| (FrameNumber(f), p)))
    }
}

/// Normalize a manifest-relative path.
///
/// The result uses `/` separators and drops `.` segments. Absolute paths and `..` are rejected.
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(ReelError::validation("frame path must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(ReelError::validation(format!(
            "frame path '{source}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation(format!(
                "frame path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation(format!(
            "frame path '{source}' must contain a file name"
        )));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/manifest.rs"]
mod tests;
