//! Typed field access over one bank.
//!
//! [`BankView`] is the read side and is public. Writes go through
//! [`BankViewMut`], which is crate-private: the only public way to change a
//! field is a [`Transaction`](crate::transaction::Transaction), which applies
//! the same write to both banks.

pub mod money;
pub mod party;
pub mod pocket;
pub mod trainer;

use serde::Serialize;

use crate::core_api::CoreError;
use crate::image::SaveImage;
use crate::layout::{BankLayout, ByteRange, Field, PocketKind, SaveLayout};

#[derive(Debug, Clone, Copy)]
pub struct BankView<'a> {
    image: &'a SaveImage,
    bank: &'a BankLayout,
}

impl<'a> BankView<'a> {
    pub fn new(image: &'a SaveImage, bank: &'a BankLayout) -> Self {
        Self { image, bank }
    }

    pub fn bank(&self) -> &'a BankLayout {
        self.bank
    }

    pub fn image(&self) -> &'a SaveImage {
        self.image
    }

    fn field_bytes(&self, field: Field) -> Result<&'a [u8], CoreError> {
        self.image.slice(self.bank.field_range(field)?)
    }
}

pub(crate) struct BankViewMut<'a> {
    image: &'a mut SaveImage,
    bank: &'a BankLayout,
}

impl<'a> BankViewMut<'a> {
    pub(crate) fn new(image: &'a mut SaveImage, bank: &'a BankLayout) -> Self {
        Self { image, bank }
    }

    pub(crate) fn view(&self) -> BankView<'_> {
        BankView::new(self.image, self.bank)
    }
}

/// A mirrored region whose bytes differ between the two banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Divergence {
    Field(Field),
    Pocket(PocketKind),
}

impl Divergence {
    /// Where this region sits in `bank`.
    pub fn range(&self, bank: &BankLayout) -> Result<ByteRange, CoreError> {
        match *self {
            Self::Field(field) => bank.field_range(field),
            Self::Pocket(kind) => Ok(bank.pocket(kind)?.range()),
        }
    }
}

/// Lists every mirrored field and pocket whose raw bytes differ between the
/// banks. An empty list means the banks hold the same logical save.
pub fn divergent_regions(
    image: &SaveImage,
    layout: &SaveLayout,
) -> Result<Vec<Divergence>, CoreError> {
    let [first, second] = &layout.banks;
    let mut out = Vec::new();

    for entry in first.fields {
        let a = image.slice(first.field_range(entry.field)?)?;
        let Ok(other) = second.field_range(entry.field) else {
            continue;
        };
        if a != image.slice(other)? {
            out.push(Divergence::Field(entry.field));
        }
    }

    for pocket in first.pockets {
        let Ok(other) = second.pocket(pocket.kind) else {
            continue;
        };
        if image.slice(pocket.range())? != image.slice(other.range())? {
            out.push(Divergence::Pocket(pocket.kind));
        }
    }

    Ok(out)
}

fn slot_range(base: usize, slot_index: usize, width: usize) -> ByteRange {
    let start = base + slot_index * width;
    ByteRange::new(start, start + width)
}
