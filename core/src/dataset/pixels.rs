use crate::dataset::tags::{
    get_int_value, get_string_value, get_u16_value, put_str, put_u16, BITS_ALLOCATED, COLUMNS,
    NUMBER_OF_FRAMES, PHOTOMETRIC_INTERPRETATION, PIXEL_DATA, PLANAR_CONFIGURATION, ROWS,
    SAMPLES_PER_PIXEL,
};
use crate::error::PixelDataError;
use crate::split::AxisSlice;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::{DataElement, VR};
use dicom_dictionary_std::uids::EXPLICIT_VR_LITTLE_ENDIAN;
use dicom_object::{FileDicomObject, InMemDicomObject};
use dicom_pixeldata::PixelDecoder;
use log::debug;
use ndarray::{Array2, ArrayD, Axis, IxDyn};

type PixelResult<T> = std::result::Result<T, PixelDataError>;

/// Storage words of a pixel array
///
/// `U8` is written back as OB, `U16` as OW, so the codec keeps the byte
/// order of the transfer syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelWords {
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
}

impl PixelWords {
    fn shape(&self) -> &[usize] {
        match self {
            PixelWords::U8(a) => a.shape(),
            PixelWords::U16(a) => a.shape(),
        }
    }
}

/// Pixel array of one dataset
///
/// Logical axes are `[rows, columns]`, or `[frames, rows, columns]` for
/// multi-frame images. The words of one pixel (samples, multi-word samples)
/// sit on a trailing storage axis that is never split.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    words: PixelWords,
    multi_frame: bool,
    decoded: bool,
}

impl PixelBuffer {
    /// Wraps storage words; the last axis holds the words of one pixel
    ///
    /// # Errors
    ///
    /// Returns an error unless the array has 3 axes (single frame) or
    /// 4 axes (multi-frame).
    pub fn from_words(words: PixelWords) -> PixelResult<Self> {
        let multi_frame = match words.shape().len() {
            3 => false,
            4 => true,
            n => {
                return Err(PixelDataError::Unsupported(format!(
                    "{} storage axes",
                    n
                )))
            }
        };
        Ok(Self {
            words,
            multi_frame,
            decoded: false,
        })
    }

    /// Storage words
    pub fn words(&self) -> &PixelWords {
        &self.words
    }

    /// Logical shape: `[rows, columns]` or `[frames, rows, columns]`
    pub fn shape(&self) -> &[usize] {
        let shape = self.words.shape();
        &shape[..shape.len() - 1]
    }

    pub fn is_multi_frame(&self) -> bool {
        self.multi_frame
    }

    /// Whether the words were decoded from encapsulated pixel data
    pub fn is_decoded(&self) -> bool {
        self.decoded
    }

    pub fn rows(&self) -> usize {
        let shape = self.shape();
        shape[shape.len() - 2]
    }

    pub fn columns(&self) -> usize {
        let shape = self.shape();
        shape[shape.len() - 1]
    }

    pub fn frames(&self) -> usize {
        if self.multi_frame {
            self.shape()[0]
        } else {
            1
        }
    }

    /// Converts a start vector over the logical axes to (row, column)
    pub fn in_plane(&self, start: &[usize]) -> (usize, usize) {
        let n = start.len();
        (start[n - 2], start[n - 1])
    }
}

impl From<Array2<u16>> for PixelBuffer {
    fn from(image: Array2<u16>) -> Self {
        Self {
            words: PixelWords::U16(image.insert_axis(Axis(2)).into_dyn()),
            multi_frame: false,
            decoded: false,
        }
    }
}

impl From<Array2<u8>> for PixelBuffer {
    fn from(image: Array2<u8>) -> Self {
        Self {
            words: PixelWords::U8(image.insert_axis(Axis(2)).into_dyn()),
            multi_frame: false,
            decoded: false,
        }
    }
}

impl AxisSlice for PixelBuffer {
    fn ndim(&self) -> usize {
        self.shape().len()
    }

    fn len_of(&self, axis: usize) -> usize {
        self.shape()[axis]
    }

    fn slice_along(&self, axis: usize, start: usize, len: usize) -> Self {
        let words = match &self.words {
            PixelWords::U8(a) => PixelWords::U8(a.slice_along(axis, start, len)),
            PixelWords::U16(a) => PixelWords::U16(a.slice_along(axis, start, len)),
        };
        Self {
            words,
            multi_frame: self.multi_frame,
            decoded: self.decoded,
        }
    }
}

/// Pixel module attributes needed to shape the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelLayout {
    rows: usize,
    columns: usize,
    frames: usize,
    samples: usize,
    bits_allocated: usize,
}

impl PixelLayout {
    fn from_dataset(dcm: &InMemDicomObject) -> PixelResult<Self> {
        let rows = get_u16_value(dcm, ROWS).ok_or(PixelDataError::MissingAttribute("Rows"))?;
        let columns =
            get_u16_value(dcm, COLUMNS).ok_or(PixelDataError::MissingAttribute("Columns"))?;
        let bits_allocated = get_u16_value(dcm, BITS_ALLOCATED)
            .ok_or(PixelDataError::MissingAttribute("BitsAllocated"))?;
        let samples = get_u16_value(dcm, SAMPLES_PER_PIXEL).unwrap_or(1).max(1);
        let frames = get_int_value(dcm, NUMBER_OF_FRAMES).unwrap_or(1).max(1);

        if bits_allocated == 0 || bits_allocated % 8 != 0 {
            return Err(PixelDataError::Unsupported(format!(
                "BitsAllocated {}",
                bits_allocated
            )));
        }
        if samples > 1 && get_u16_value(dcm, PLANAR_CONFIGURATION).unwrap_or(0) == 1 {
            return Err(PixelDataError::Unsupported(
                "colour-by-plane PlanarConfiguration".to_string(),
            ));
        }

        Ok(Self {
            rows: rows as usize,
            columns: columns as usize,
            frames: frames as usize,
            samples: samples as usize,
            bits_allocated: bits_allocated as usize,
        })
    }

    fn pixel_count(&self) -> usize {
        self.frames * self.rows * self.columns
    }

    fn bytes_per_pixel(&self) -> usize {
        self.samples * self.bits_allocated / 8
    }

    fn shape(&self, words_per_pixel: usize) -> IxDyn {
        if self.frames > 1 {
            IxDyn(&[self.frames, self.rows, self.columns, words_per_pixel])
        } else {
            IxDyn(&[self.rows, self.columns, words_per_pixel])
        }
    }

    fn from_u16_words(&self, words: &[u16]) -> PixelResult<PixelWords> {
        let per_pixel = self.bytes_per_pixel() / 2;
        let expected = self.pixel_count() * per_pixel;
        if words.len() < expected {
            return Err(PixelDataError::Truncated {
                expected: expected * 2,
                found: words.len() * 2,
            });
        }
        let array = ArrayD::from_shape_vec(self.shape(per_pixel), words[..expected].to_vec())?;
        Ok(PixelWords::U16(array))
    }

    fn from_bytes(&self, bytes: &[u8]) -> PixelResult<PixelWords> {
        let per_pixel = self.bytes_per_pixel();
        let expected = self.pixel_count() * per_pixel;
        if bytes.len() < expected {
            return Err(PixelDataError::Truncated {
                expected,
                found: bytes.len(),
            });
        }
        let array = ArrayD::from_shape_vec(self.shape(per_pixel), bytes[..expected].to_vec())?;
        Ok(PixelWords::U8(array))
    }

    fn from_little_endian(&self, bytes: &[u8]) -> PixelResult<PixelWords> {
        if self.bits_allocated == 8 {
            return self.from_bytes(bytes);
        }
        let words: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        self.from_u16_words(&words)
    }
}

/// Reads the pixel array of a dataset
///
/// Native pixel data is taken as stored. Encapsulated pixel data is decoded
/// and marked with [`PixelBuffer::is_decoded`]; callers must then write the
/// dataset with a native transfer syntax (see [`use_native_encoding`]).
///
/// Returns `Ok(None)` when the dataset has no PixelData.
///
/// # Errors
///
/// Returns an error if the pixel module attributes are missing or the pixel
/// data cannot be represented as a word array.
pub fn read_pixel_buffer(
    file: &FileDicomObject<InMemDicomObject>,
) -> PixelResult<Option<PixelBuffer>> {
    let Ok(element) = file.element(PIXEL_DATA) else {
        return Ok(None);
    };
    let layout = PixelLayout::from_dataset(file)?;

    let (words, decoded) = match element.value() {
        Value::Primitive(PrimitiveValue::U16(words)) if layout.bits_allocated % 16 == 0 => {
            (layout.from_u16_words(words)?, false)
        }
        Value::Primitive(value) => (layout.from_bytes(&value.to_bytes())?, false),
        Value::PixelSequence(_) => {
            debug!("Decoding encapsulated pixel data");
            let decoded = file.decode_pixel_data()?;
            (layout.from_little_endian(decoded.data())?, true)
        }
        Value::Sequence(_) => {
            return Err(PixelDataError::Unsupported(
                "PixelData holds a sequence".to_string(),
            ))
        }
    };

    let mut buffer = PixelBuffer::from_words(words)?;
    buffer.decoded = decoded;
    Ok(Some(buffer))
}

/// Replaces the pixel data of `dcm` and updates Rows and Columns to match
///
/// Multi-frame buffers also update NumberOfFrames.
pub fn set_pixel_data(dcm: &mut InMemDicomObject, pixels: &PixelBuffer) {
    let (vr, value) = match &pixels.words {
        PixelWords::U8(a) => {
            let mut bytes: Vec<u8> = a.iter().copied().collect();
            if bytes.len() % 2 == 1 {
                bytes.push(0);
            }
            (VR::OB, PrimitiveValue::from(bytes))
        }
        PixelWords::U16(a) => (VR::OW, PrimitiveValue::U16(a.iter().copied().collect())),
    };
    dcm.put(DataElement::new(PIXEL_DATA, vr, value));

    put_u16(dcm, ROWS, pixels.rows() as u16);
    put_u16(dcm, COLUMNS, pixels.columns() as u16);
    if pixels.is_multi_frame() {
        put_str(dcm, NUMBER_OF_FRAMES, VR::IS, pixels.frames().to_string());
    }
}

/// Switches a file holding decoded pixels to Explicit VR Little Endian
///
/// Colour images decoded from YBR encodings are stored as RGB.
pub fn use_native_encoding(file: &mut FileDicomObject<InMemDicomObject>) {
    let samples = get_u16_value(file, SAMPLES_PER_PIXEL).unwrap_or(1);
    let photometric = get_string_value(file, PHOTOMETRIC_INTERPRETATION).unwrap_or_default();
    if samples == 3 && photometric.starts_with("YBR") {
        put_str(file, PHOTOMETRIC_INTERPRETATION, VR::CS, "RGB");
        put_u16(file, PLANAR_CONFIGURATION, 0);
    }

    let meta = file.meta_mut();
    meta.transfer_syntax = EXPLICIT_VR_LITTLE_ENDIAN.to_string();
    meta.update_information_group_length();
}
