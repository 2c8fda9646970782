use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use log::{debug, info};
use maneuver_cmds::CommandSequence;

use crate::{
    header::{check_sequence, render_header, splice_declaration},
    CodegenError,
};

/// The firmware source tree.
/// Every read and write is confined to the base directory.
#[derive(Debug, Clone)]
pub struct FirmwareDir {
    base: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CodegenError + '_ {
    move |source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl FirmwareDir {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub(crate) fn base(&self) -> &Path {
        &self.base
    }

    /// Joins `relative` onto the base directory.
    ///
    /// Absolute paths and paths that climb out of the base with `..`
    /// are rejected. Resolution is lexical, the file does not have to exist.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf, CodegenError> {
        let relative = relative.as_ref();
        let outside = || CodegenError::PathOutsideBase(relative.to_path_buf());

        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop().ok_or_else(outside)?;
                }
                Component::RootDir | Component::Prefix(_) => return Err(outside()),
            }
        }
        if parts.is_empty() {
            return Err(outside());
        }

        Ok(parts.into_iter().fold(self.base.clone(), |path, part| path.join(part)))
    }

    /// Reads a file, or returns `None` if it does not exist.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<Option<String>, CodegenError> {
        let path = self.resolve(relative)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read {} bytes from {}", contents.len(), path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    /// Writes a file, creating missing parent directories.
    /// Returns the path that was written.
    pub fn write(
        &self,
        relative: impl AsRef<Path>,
        contents: &str,
    ) -> Result<PathBuf, CodegenError> {
        let path = self.resolve(relative)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }
        fs::write(&path, contents).map_err(io_error(&path))?;
        info!("Code written to {}", path.display());
        Ok(path)
    }

    /// Puts `sequence` into the header at `relative`.
    ///
    /// Only the `direction_sequence[]` declaration is replaced.
    /// If the header is missing, a fresh one is generated.
    pub fn update_sequence(
        &self,
        relative: impl AsRef<Path>,
        sequence: &CommandSequence<'_>,
    ) -> Result<PathBuf, CodegenError> {
        let relative = relative.as_ref();
        let contents = match self.read(relative)? {
            Some(existing) => splice_declaration(&existing, sequence)?,
            None => {
                info!(
                    "{} does not exist, generating it from the template",
                    relative.display()
                );
                check_sequence(sequence)?;
                render_header(sequence)
            }
        };
        self.write(relative, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{header::check_vocabulary, parser::find_declaration};
    use maneuver_cmds::{Direction::*, DIRECTION_SEQUENCE};

    const HEADER: &str = "M5Stampfly/src/direction_sequence.hpp";

    #[test]
    fn test_resolve_stays_inside_base() {
        let dir = FirmwareDir::new("/srv/firmware");
        assert_eq!(
            dir.resolve("M5Stampfly/src/x.hpp").unwrap(),
            PathBuf::from("/srv/firmware/M5Stampfly/src/x.hpp")
        );
        assert_eq!(
            dir.resolve("./a/../b.hpp").unwrap(),
            PathBuf::from("/srv/firmware/b.hpp")
        );

        for bad in ["../secret", "a/../../b", "/etc/passwd", "", "."] {
            assert!(
                matches!(dir.resolve(bad), Err(CodegenError::PathOutsideBase(_))),
                "Expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_read_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FirmwareDir::new(tmp.path());
        assert_eq!(dir.read("nope.hpp").unwrap(), None);
    }

    #[test]
    fn test_write_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FirmwareDir::new(tmp.path());

        let path = dir.write("a/b/c.txt", "hello").unwrap();
        assert_eq!(path, tmp.path().join("a/b/c.txt"));
        assert_eq!(dir.read("a/b/c.txt").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_update_generates_missing_header() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FirmwareDir::new(tmp.path());

        dir.update_sequence(HEADER, &DIRECTION_SEQUENCE).unwrap();

        let written = dir.read(HEADER).unwrap().unwrap();
        assert!(check_vocabulary(&written).is_ok());
        assert_eq!(find_declaration(&written).unwrap().sequence(), DIRECTION_SEQUENCE);
    }

    #[test]
    fn test_update_splices_existing_header() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FirmwareDir::new(tmp.path());
        let before = "// keep me\nDirection_t direction_sequence[] = {FLIP};\n// and me\n";
        dir.write(HEADER, before).unwrap();

        let steps = [Back, Back];
        dir.update_sequence(HEADER, &CommandSequence::new(&steps))
            .unwrap();

        assert_eq!(
            dir.read(HEADER).unwrap().unwrap(),
            "// keep me\nDirection_t direction_sequence[] = {BACK, BACK};\n// and me\n"
        );
    }

    #[test]
    fn test_update_repairs_stale_header() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FirmwareDir::new(tmp.path());
        dir.write(
            HEADER,
            "Direction_t direction_sequence[] = {UP, /* old */ DOWN};\n",
        )
        .unwrap();

        dir.update_sequence(HEADER, &DIRECTION_SEQUENCE).unwrap();

        let written = dir.read(HEADER).unwrap().unwrap();
        assert_eq!(find_declaration(&written).unwrap().sequence(), DIRECTION_SEQUENCE);
    }

    #[test]
    fn test_update_leaves_file_alone_on_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FirmwareDir::new(tmp.path());
        dir.write(HEADER, "int main() {}\n").unwrap();

        assert!(matches!(
            dir.update_sequence(HEADER, &DIRECTION_SEQUENCE),
            Err(CodegenError::DeclarationNotFound)
        ));
        assert!(matches!(
            dir.update_sequence("../escape.hpp", &DIRECTION_SEQUENCE),
            Err(CodegenError::PathOutsideBase(_))
        ));
        assert_eq!(dir.read(HEADER).unwrap().unwrap(), "int main() {}\n");
    }
}
