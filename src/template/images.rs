//! Image reference resolution and embedding. The vehicle sheet stores image
//! references as authored: an http(s) URL, a bare file name, or a full path
//! from someone else's machine. Local references are re-rooted by basename
//! under the configured asset directory; remote references are recognized
//! but not fetched (generation does only local I/O) and the image is
//! omitted. A missing file is never an error, the image is simply left out.

use log::debug;
use std::path::Path;
use std::path::PathBuf;
use umya_spreadsheet::structs::drawing::spreadsheet::MarkerType;
use umya_spreadsheet::structs::Image;
use umya_spreadsheet::Worksheet;
use url::Url;

/// Where an image reference points after classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ImageSource {
    /// A file expected under the local asset root
    Local(PathBuf),
    /// A remote URL; recognized but not fetched
    Remote(Url),
}

/// Classifies an image reference. Local references keep only their
/// basename and are re-rooted under `root/subdir`; blank references and
/// references without a usable basename resolve to `None`.
pub(crate) fn resolve_image_source(
    reference: &str,
    root: &Path,
    subdir: &str,
) -> Option<ImageSource> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(reference) {
        if url.scheme() == "http" || url.scheme() == "https" {
            return Some(ImageSource::Remote(url));
        }
    }
    let normalized = reference.replace('\\', "/");
    let basename = Path::new(&normalized).file_name()?;
    Some(ImageSource::Local(root.join(subdir).join(basename)))
}

/// Embeds a local image at a fixed anchor cell. Returns whether the image
/// was actually embedded; an absent file is skipped quietly.
pub(crate) fn embed_image(sheet: &mut Worksheet, path: &Path, anchor: &str) -> bool {
    if !path.is_file() {
        debug!("image '{}' not found, omitted", path.display());
        return false;
    }
    let Some(path_str) = path.to_str() else {
        debug!("image path '{}' is not valid UTF-8, omitted", path.display());
        return false;
    };
    let mut marker = MarkerType::default();
    marker.set_coordinate(anchor);
    let mut image = Image::default();
    image.new_image(path_str, marker);
    sheet.add_image(image);
    true
}

/// Embeds a classified source, skipping remote references.
pub(crate) fn embed_source(sheet: &mut Worksheet, source: ImageSource, anchor: &str) -> bool {
    match source {
        ImageSource::Local(path) => embed_image(sheet, &path, anchor),
        ImageSource::Remote(url) => {
            debug!("remote image '{}' not fetched, omitted", url);
            false
        }
    }
}
