//! Image source port for loading leaf photos.

use crate::domain::LeafImage;
use crate::error::Result;

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// # Errors
    ///
    /// Individual items are `Error::ImageDecode` if an image fails to load.
    fn images(&self) -> Box<dyn Iterator<Item = Result<LeafImage>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
