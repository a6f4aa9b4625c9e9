use super::{named, FileProvider, Validate};
use crate::error::AppResult;
use crate::faker;
use crate::formats::mp3;
use crate::types::{check_range, Category, FileNaming, GeneratedFile, Mp3Generator, MAX_NB_CHARS_LIMIT};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Mp3FileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    /// Upper bound of the spoken text length, in characters
    pub max_nb_chars: usize,
    /// Template used instead of random text
    pub content: Option<String>,
    pub mp3_generator: Mp3Generator,
}

impl Default for Mp3FileRequest {
    fn default() -> Self {
        Self {
            naming: FileNaming::default(),
            max_nb_chars: 500,
            content: None,
            mp3_generator: Mp3Generator::default(),
        }
    }
}

impl Validate for Mp3FileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        check_range("max_nb_chars", self.max_nb_chars, 1, MAX_NB_CHARS_LIMIT)
    }
}

pub struct Mp3File;

impl FileProvider for Mp3File {
    const NAME: &'static str = "mp3_file";
    const CATEGORY: Category = Category::Audio;
    const SUMMARY: &'static str = "MP3 file provider.";

    type Request = Mp3FileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = faker::body_text(rng, request.content.as_deref(), request.max_nb_chars, None)?;
        let title = faker::token_value("sentence", rng)?;
        let bytes = mp3::mp3(request.mp3_generator, &title, &text);
        Ok(named(rng, &request.naming, "mp3", bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mp3_starts_with_id3() {
        let mut rng = StdRng::seed_from_u64(61);
        let file = Mp3File::generate(&Mp3FileRequest::default(), &mut rng).unwrap();
        assert_eq!(&file.bytes[..3], b"ID3");
        assert!(file.filename.ends_with(".mp3"));
    }

    #[test]
    fn test_low_bitrate_is_smaller() {
        let request = Mp3FileRequest {
            content: Some("a fixed sentence read aloud for a few seconds".to_string()),
            ..Mp3FileRequest::default()
        };
        let high = Mp3File::generate(&request, &mut StdRng::seed_from_u64(62)).unwrap();
        let low = Mp3File::generate(
            &Mp3FileRequest {
                mp3_generator: Mp3Generator::Cbr32k,
                ..request.clone()
            },
            &mut StdRng::seed_from_u64(62),
        )
        .unwrap();
        assert!(low.bytes.len() < high.bytes.len());
    }

    #[test]
    fn test_unknown_generator_rejected() {
        assert!(serde_json::from_str::<Mp3FileRequest>(r#"{"mp3_generator": "gtts"}"#).is_err());
        assert!(serde_json::from_str::<Mp3FileRequest>(r#"{"max_nb_chars": 0}"#)
            .unwrap()
            .validate()
            .is_err());
    }
}
