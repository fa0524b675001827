//! An opened PDF and the crop/split operations on it.

use labelcrop_core::{
    CropBox, CropError, LabelDimensions, PageGeometry, PdfRect, Size, SplitPlan,
    split_at_anchor, split_fixed,
};
use labelcrop_pdf::{LopdfBackend, LopdfDocument, PageBox, PagePlan, PdfMutator};
use serde::{Deserialize, Serialize};

/// How far into the input the `%PDF-` header may appear.
const HEADER_SEARCH_LEN: usize = 1024;

/// Which pages a crop applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropScope {
    /// Every page of the document.
    #[default]
    All,
    /// Only the page the box was drawn on.
    Current,
}

/// Whether `bytes` start like a PDF file.
///
/// Some producers prepend junk before the header, so the `%PDF-` marker is
/// accepted anywhere in the first kilobyte.
pub fn is_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SEARCH_LEN)];
    head.windows(5).any(|w| w == b"%PDF-")
}

/// A PDF document opened for cropping.
///
/// Holds the original bytes and the parsed document. Operations never mutate
/// the opened document; each returns the bytes of a new PDF.
///
/// # Example
///
/// ```ignore
/// let doc = Document::open(bytes)?;
/// let out = doc.split_at_anchor(60.0)?;
/// std::fs::write("split.pdf", out)?;
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    doc: LopdfDocument,
    pages: Vec<PageBox>,
}

impl Document {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`CropError`] if the file cannot be read or is not a valid PDF.
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, CropError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(bytes)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Encrypted`] for encrypted files and
    /// [`CropError::ParseError`] if the bytes are not a readable PDF or a
    /// page has no usable page box.
    pub fn open(bytes: impl Into<Vec<u8>>) -> Result<Self, CropError> {
        let bytes = bytes.into();
        let doc = LopdfBackend::open(&bytes)?;
        let pages = (0..LopdfBackend::page_count(&doc))
            .map(|i| LopdfBackend::page_box(&doc, i))
            .collect::<Result<Vec<_>, _>>()?;
        if pages.is_empty() {
            return Err(CropError::ParseError("document has no pages".into()));
        }
        Ok(Self { bytes, doc, pages })
    }

    /// The bytes the document was opened from.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Visible box of a page.
    pub fn page_box(&self, index: usize) -> Result<PageBox, CropError> {
        self.pages
            .get(index)
            .copied()
            .ok_or(CropError::PageOutOfRange {
                index,
                page_count: self.pages.len(),
            })
    }

    /// Page size in PDF points.
    pub fn page_size(&self, index: usize) -> Result<Size, CropError> {
        self.page_box(index).map(|b| b.size)
    }

    /// Apply each `(page, rect)` as that page's CropBox and MediaBox.
    ///
    /// Pages not listed are copied unchanged.
    pub fn crop_pages(&self, targets: &[(usize, PdfRect)]) -> Result<Vec<u8>, CropError> {
        if targets.is_empty() {
            return Err(CropError::InvalidGeometry("no pages to crop".into()));
        }
        let mut doc = self.doc.clone();
        for (index, rect) in targets {
            LopdfBackend::set_page_box(&mut doc, *index, rect)?;
        }
        Ok(LopdfBackend::save(&mut doc)?)
    }

    /// Crop to a box drawn on page `index`, rendered at `viewport` pixels.
    ///
    /// The box is clipped to the viewport first. With [`CropScope::All`]
    /// every page is cropped; each page's own point size is paired with
    /// `viewport` to scale the box.
    pub fn crop(
        &self,
        crop: CropBox,
        index: usize,
        viewport: Size,
        scope: CropScope,
    ) -> Result<Vec<u8>, CropError> {
        let active = PageGeometry::new(self.page_size(index)?, viewport)?;
        let crop = crop.clamp_to(viewport);
        if !crop.is_finalizable() {
            return Err(CropError::InvalidGeometry(format!(
                "crop box {:.1}x{:.1} is too small",
                crop.width, crop.height
            )));
        }

        let targets = match scope {
            CropScope::Current => vec![(index, active.to_pdf(&crop))],
            CropScope::All => (0..self.page_count())
                .map(|i| {
                    let geo = active.with_page(self.page_size(i)?)?;
                    Ok((i, geo.to_pdf(&crop)))
                })
                .collect::<Result<Vec<_>, CropError>>()?,
        };
        self.crop_pages(&targets)
    }

    /// Replace page 1 with its label and invoice bands, keeping the remaining
    /// pages after them.
    pub fn split(&self, plan: &SplitPlan) -> Result<Vec<u8>, CropError> {
        let mut layout = vec![
            PagePlan::cropped(0, plan.label),
            PagePlan::cropped(0, plan.invoice),
        ];
        layout.extend((1..self.page_count()).map(PagePlan::keep));
        let mut doc = LopdfBackend::compose(&self.doc, &layout)?;
        Ok(LopdfBackend::save(&mut doc)?)
    }

    /// Split page 1 at `anchor_percent` of its height from the top.
    pub fn split_at_anchor(&self, anchor_percent: f64) -> Result<Vec<u8>, CropError> {
        let plan = split_at_anchor(self.page_size(0)?, anchor_percent)?;
        self.split(&plan)
    }

    /// Split page 1 into fixed-height label and invoice bands.
    pub fn split_fixed(&self, dims: &LabelDimensions) -> Result<Vec<u8>, CropError> {
        let plan = split_fixed(self.page_size(0)?, dims)?;
        self.split(&plan)
    }
}
