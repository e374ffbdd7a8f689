/*! Dataset card.

Generates the `README.md` published along with the shards: a YAML front matter
understood by dataset hubs, loading instructions and per-split counts.
!*/
use std::fmt::Write;

use crate::config::{Config, SpeakerMetadata};
use crate::pipelines::RunStats;

/// Size bucket of a dataset, as used in dataset hub front matters.
pub fn size_category(files: usize) -> &'static str {
    match files {
        0..=999 => "n<1K",
        1_000..=9_999 => "1K<n<10K",
        10_000..=99_999 => "10K<n<100K",
        100_000..=999_999 => "100K<n<1M",
        _ => "n>1M",
    }
}

fn columns(speaker: &SpeakerMetadata) -> String {
    format!(
        "Each sample contains:
- **audio** (`.wav` file): Raw WAV audio bytes
- **metadata** (`.json` file):
  - `text`: transcription
  - `file_id`: Unique identifier
  - `category`: Category code (e.g., SPOR, AGRI)
  - `domain`: Full domain name
  - `speaker_id`: {}
  - `speaker_gender`: {}
  - `speaker_age`: {}
  - `language`: {}
",
        speaker.speaker_id, speaker.speaker_gender, speaker.speaker_age, speaker.language
    )
}

/// Render the dataset card of `dataset_id`.
pub fn render(dataset_id: &str, config: &Config, stats: &RunStats) -> String {
    let speaker = &config.speaker;
    let title = config.title.as_deref().unwrap_or(dataset_id);

    let mut card = String::new();
    // writing into a String can't fail
    let _ = write!(
        card,
        "---
license: {license}
task_categories:
- text-to-speech
language:
- {language}
size_categories:
- {size}
---

# {title}

Speech dataset in WebDataset format.

## Dataset Details

- **Total Files**: {total}
- **Speaker**: {speaker_id} ({gender}, Age {age})
- **Language**: {language}

## Loading the Dataset

```python
from datasets import load_dataset

dataset = load_dataset(\"webdataset\", data_dir=\"{dataset_id}/resolve/main/data\")

for sample in dataset[\"{first_split}\"]:
    audio = sample[\"wav\"]  # Audio bytes (WAV format)
    metadata = sample[\"json\"]  # Metadata dict
    print(metadata[\"text\"])
```

## Columns

{columns}
## Splits

",
        license = config.license,
        language = speaker.language,
        size = size_category(stats.total_files()),
        title = title,
        total = stats.total_files(),
        speaker_id = speaker.speaker_id,
        gender = speaker.speaker_gender,
        age = speaker.speaker_age,
        dataset_id = dataset_id,
        first_split = stats
            .splits
            .first()
            .map(|s| s.split.as_str())
            .unwrap_or("train"),
        columns = columns(speaker),
    );

    for split in &stats.splits {
        let _ = writeln!(
            card,
            "- **{}**: {} files in {} TAR shards",
            split.split, split.files, split.shards
        );
    }

    let _ = write!(card, "\n## License\n\n{}\n", config.license.to_uppercase());
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::SplitStats;

    #[test]
    fn sizes() {
        assert_eq!(size_category(0), "n<1K");
        assert_eq!(size_category(999), "n<1K");
        assert_eq!(size_category(1000), "1K<n<10K");
        assert_eq!(size_category(12_345), "10K<n<100K");
        assert_eq!(size_category(2_000_000), "n>1M");
    }

    #[test]
    fn render_card() {
        let stats = RunStats {
            splits: vec![
                SplitStats {
                    split: "train".to_string(),
                    files: 1200,
                    shards: 3,
                },
                SplitStats {
                    split: "test".to_string(),
                    files: 100,
                    shards: 1,
                },
            ],
        };
        let card = render("org/gujarati-tts", &Config::default(), &stats);

        assert!(card.starts_with("---\nlicense: cc-by-4.0\n"));
        assert!(card.contains("- gu\n"));
        assert!(card.contains("- 1K<n<10K\n"));
        assert!(card.contains("# org/gujarati-tts\n"));
        assert!(card.contains("- **Total Files**: 1300\n"));
        assert!(card.contains("- **train**: 1200 files in 3 TAR shards\n"));
        assert!(card.contains("- **test**: 100 files in 1 TAR shards\n"));
        assert!(card.contains("data_dir=\"org/gujarati-tts/resolve/main/data\""));
        assert!(card.ends_with("## License\n\nCC-BY-4.0\n"));
    }
}
