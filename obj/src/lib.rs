use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use common::constants::{MEM_WORDS, WORD_SIZE};
use common::mem::{ReadU16Be, WriteU16Be, as_byte_slice};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image is empty or truncated before the origin word")]
    MissingOrigin,

    #[error("image has a trailing odd byte after {words} words")]
    Misaligned { words: usize },

    #[error("{words} words at origin {origin:#06x} overflow the address space")]
    TooLarge { origin: u16, words: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

// A program image: a run of words and the address they are loaded at, which
// is also where execution begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    origin: u16,
    words: Vec<u16>,
}

impl Image {
    pub fn new(origin: u16, words: Vec<u16>) -> Result<Image, LoadError> {
        if origin as usize + words.len() > MEM_WORDS {
            return Err(LoadError::TooLarge { origin, words: words.len() });
        }
        Ok(Image { origin, words })
    }

    pub fn origin(&self) -> u16 {
        self.origin
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    // One past the last loaded address, or None if the image runs up to the
    // top of memory.
    pub fn end(&self) -> Option<u16> {
        u16::try_from(self.origin as usize + self.words.len()).ok()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Image, LoadError> {
        let path = path.as_ref();
        let image = Self::read_from(&mut BufReader::new(File::open(path)?))?;
        debug!(
            "Image: loaded {} words from {} at {:#06x}",
            image.words.len(),
            path.display(),
            image.origin
        );
        Ok(image)
    }

    pub fn read_from(reader: &mut impl Read) -> Result<Image, LoadError> {
        let origin = match reader.read_u16_be() {
            Ok(origin) => origin,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(LoadError::MissingOrigin);
            }
            Err(e) => return Err(e.into()),
        };

        let mut body = vec![];
        reader.read_to_end(&mut body)?;

        let chunks = body.chunks_exact(WORD_SIZE as usize);
        if !chunks.remainder().is_empty() {
            return Err(LoadError::Misaligned { words: chunks.len() });
        }
        let words = chunks.map(|w| u16::from_be_bytes([w[0], w[1]])).collect();

        Self::new(origin, words)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_u16_be(self.origin)?;
        let be: Vec<u16> = self.words.iter().map(|w| w.to_be()).collect();
        writer.write_all(as_byte_slice(&be))
    }
}
