// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input collection — expand directories, filter by extension, and put the
// result into the page order used for the PDF.
//
// Page order is always the lexicographic order of the full path strings. The
// order the caller supplied is only a starting point and is discarded here.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bildpresse_core::error::{ConvertError, Result};
use bildpresse_core::is_supported_image;
use tracing::{debug, info, instrument};

/// Lists the direct entries of one directory, in any order.
pub type ListDirectory = fn(&Path) -> io::Result<Vec<PathBuf>>;

/// [`ListDirectory`] backed by the filesystem.
pub fn read_directory(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect()
}

/// Expand, filter, sort, and de-duplicate `inputs`.
///
/// Returns [`ConvertError::NoValidImages`] if nothing with a supported
/// extension remains.
pub fn collect_images<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    collect_images_with(inputs, read_directory)
}

/// [`collect_images`] with directories listed by `list`.
#[instrument(skip_all, fields(inputs = inputs.len()))]
pub fn collect_images_with<P: AsRef<Path>>(
    inputs: &[P],
    list: ListDirectory,
) -> Result<Vec<PathBuf>> {
    let expanded = expand_with(inputs, list)?;
    let mut images = filter_supported(expanded);

    if images.is_empty() {
        info!("no input has a supported image extension");
        return Err(ConvertError::NoValidImages);
    }

    sort_page_order(&mut images);
    info!(images = images.len(), "input images collected");
    Ok(images)
}

/// Replace every directory in `inputs` with its supported child files.
///
/// Children are listed one level deep and ordered by file name. Anything that
/// is not a directory is passed through untouched, whatever its extension.
pub fn expand_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    expand_with(inputs, read_directory)
}

fn expand_with<P: AsRef<Path>>(inputs: &[P], list: ListDirectory) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::with_capacity(inputs.len());

    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            let mut children = list_directory(input, list)?;
            children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            let before = expanded.len();
            expanded.extend(
                children
                    .into_iter()
                    .filter(|child| child.is_file() && is_supported_image(child)),
            );
            debug!(
                dir = %input.display(),
                found = expanded.len() - before,
                "expanded directory"
            );
        } else {
            expanded.push(input.to_path_buf());
        }
    }

    Ok(expanded)
}

/// Keep only paths with a supported image extension.
pub fn filter_supported(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| is_supported_image(path))
        .collect()
}

/// Sort by full path string (byte order) and drop exact duplicates.
pub fn sort_page_order(paths: &mut Vec<PathBuf>) {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    paths.dedup();
}

fn list_directory(dir: &Path, list: ListDirectory) -> Result<Vec<PathBuf>> {
    list(dir).map_err(|err| {
        ConvertError::unexpected(format!("cannot list directory {}", dir.display()), err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildpresse_core::FailureKind;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"placeholder").unwrap();
        path
    }

    #[test]
    fn directory_expands_to_supported_children_only() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        touch(dir, "z.png");
        touch(dir, "a.JPG");
        touch(dir, "notes.txt");
        touch(dir, "m.webp");
        fs::create_dir(dir.join("nested.png")).unwrap();

        let expanded = expand_inputs(&[dir]).unwrap();
        let names: Vec<_> = expanded
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "m.webp", "z.png"]);
    }

    #[test]
    fn files_pass_through_expansion_verbatim() {
        let expanded = expand_inputs(&["missing/readme.txt", "missing/x.png"]).unwrap();
        assert_eq!(
            expanded,
            vec![
                PathBuf::from("missing/readme.txt"),
                PathBuf::from("missing/x.png")
            ]
        );
    }

    #[test]
    fn caller_order_is_replaced_by_lexicographic_order() {
        let images = collect_images(&["b.png", "a.png", "c.gif"]).unwrap();
        assert_eq!(
            images,
            vec![
                PathBuf::from("a.png"),
                PathBuf::from("b.png"),
                PathBuf::from("c.gif")
            ]
        );
    }

    #[test]
    fn sort_uses_full_path_string_not_components() {
        // '.' (0x2E) sorts before '/' (0x2F) as a string.
        let mut paths = vec![PathBuf::from("a/b.png"), PathBuf::from("a.b.png")];
        sort_page_order(&mut paths);
        assert_eq!(paths, vec![PathBuf::from("a.b.png"), PathBuf::from("a/b.png")]);
    }

    #[test]
    fn duplicates_are_removed() {
        let tmp = TempDir::new().unwrap();
        let file = touch(tmp.path(), "one.png");
        let images = collect_images(&[tmp.path().to_path_buf(), file.clone()]).unwrap();
        assert_eq!(images, vec![file]);
    }

    #[test]
    fn only_unsupported_inputs_is_no_valid_images() {
        let err = collect_images(&["a.txt", "b.pdf", "c"]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoValidImages);
    }

    #[test]
    fn empty_input_is_no_valid_images() {
        let inputs: [&str; 0] = [];
        let err = collect_images(&inputs).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoValidImages);
    }

    #[test]
    fn listing_failure_aborts_collection() {
        fn refuse(_: &Path) -> io::Result<Vec<PathBuf>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"))
        }

        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        let err = collect_images_with(&[tmp.path()], refuse).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Unexpected);
        assert!(err.to_string().starts_with("unexpected error: cannot list directory"));
    }

    #[test]
    fn unlistable_directory_is_unexpected() {
        let tmp = TempDir::new().unwrap();
        let err = list_directory(&tmp.path().join("gone"), read_directory).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Unexpected);
        assert!(err.to_string().contains("cannot list directory"));
    }
}
