//! Episode numbering and target file names.
//!
//! Pure functions: nothing here touches the filesystem.

use episodist_common::{Error, MediaFile, MediaMetadata, NamingPolicy, Result};
use serde::Serialize;
use std::path::PathBuf;

/// The position, target name and tags derived for one selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Index of the file in the batch it was assigned from.
    pub index: usize,
    /// Path of the file at assignment time.
    pub file: PathBuf,
    pub season: u32,
    pub episode: u32,
    /// New file name, extension included.
    pub target_name: String,
    pub metadata: MediaMetadata,
}

/// One row of a dry-run preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
    pub season: u32,
    pub episode: u32,
    /// False when the file already carries its target name.
    pub changes_name: bool,
}

/// Replace characters that are illegal in file names on common filesystems.
///
/// ```
/// use episodist::sequencer::sanitize_title;
///
/// assert_eq!(sanitize_title("What If...?"), "What If..._");
/// assert_eq!(sanitize_title("  Show: Part 1.  "), "Show_ Part 1");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    replaced.trim().trim_end_matches('.').trim_end().to_string()
}

/// Render `"S{season:02}E{episode:0N}"`, N being the padding.
pub fn episode_label(season: u32, episode: u32, padding: u8) -> String {
    format!(
        "S{:02}E{:0width$}",
        season,
        episode,
        width = usize::from(padding)
    )
}

/// Render `"{title} - S{season:02}E{episode:0N}"`.
pub fn episode_stem(title: &str, season: u32, episode: u32, padding: u8) -> String {
    format!("{} - {}", title, episode_label(season, episode, padding))
}

/// Assign consecutive episode numbers to the selected files of `batch`, in
/// order. Unselected files are passed over without consuming a number.
pub fn assign(batch: &[MediaFile], policy: &NamingPolicy) -> Result<Vec<Assignment>> {
    policy.validate()?;

    let title = sanitize_title(&policy.title);
    if title.is_empty() {
        return Err(Error::validation(format!(
            "title {:?} has no characters usable in a file name",
            policy.title
        )));
    }

    let selected = batch.iter().filter(|f| f.selected).count();
    if selected > 0 {
        let span = u32::try_from(selected - 1)
            .map_err(|_| Error::validation("batch too large to number"))?;
        if policy.start_episode.checked_add(span).is_none() {
            return Err(Error::validation(format!(
                "episode numbers overflow: {} files starting at {}",
                selected, policy.start_episode
            )));
        }
    }

    let show = policy.title.trim().to_string();
    let mut episode = policy.start_episode;
    let mut assignments = Vec::with_capacity(selected);

    for (index, file) in batch.iter().enumerate().filter(|(_, f)| f.selected) {
        let stem = episode_stem(&title, policy.start_season, episode, policy.episode_padding);
        let target_name = match file.extension() {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem.clone(),
        };

        assignments.push(Assignment {
            index,
            file: file.path.clone(),
            season: policy.start_season,
            episode,
            target_name,
            metadata: MediaMetadata {
                title: show.clone(),
                episode_title: stem,
                genre: policy.genre,
                year: policy.year,
                season: policy.start_season,
                episode,
            },
        });
        // Checked above; saturating only guards the final iteration.
        episode = episode.saturating_add(1);
    }

    Ok(assignments)
}

/// Preview the renames `assign` would produce.
pub fn plan(batch: &[MediaFile], policy: &NamingPolicy) -> Result<Vec<PlannedRename>> {
    Ok(assign(batch, policy)?
        .into_iter()
        .map(|a| {
            let to = a.file.with_file_name(&a.target_name);
            PlannedRename {
                changes_name: to != a.file,
                from: a.file,
                to,
                season: a.season,
                episode: a.episode,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use episodist_common::Genre;

    fn policy() -> NamingPolicy {
        NamingPolicy::new("Show", Genre::Drama, 2020, 1, 1)
    }

    fn batch(names: &[&str]) -> Vec<MediaFile> {
        names
            .iter()
            .map(|n| MediaFile::from_path(format!("/tv/{n}")))
            .collect()
    }

    #[test]
    fn test_consecutive_numbers() {
        let files = batch(&["x.mp4", "y.mkv", "z.MP4"]);
        let assignments = assign(&files, &policy()).unwrap();

        let names: Vec<&str> = assignments.iter().map(|a| a.target_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Show - S01E01.mp4", "Show - S01E02.mkv", "Show - S01E03.MP4"]
        );
        assert!(assignments.iter().all(|a| a.season == 1));
        assert_eq!(assignments[2].metadata.episode, 3);
        assert_eq!(assignments[2].metadata.episode_title, "Show - S01E03");
        assert_eq!(assignments[2].metadata.title, "Show");
    }

    #[test]
    fn test_start_offsets_and_padding() {
        let files = batch(&["a.mkv", "b.mkv"]);
        let p = NamingPolicy::new("Show", Genre::Drama, 2020, 3, 98).with_padding(3);
        let assignments = assign(&files, &p).unwrap();
        assert_eq!(assignments[0].target_name, "Show - S03E098.mkv");
        assert_eq!(assignments[1].target_name, "Show - S03E099.mkv");
    }

    #[test]
    fn test_episode_label_padding() {
        assert_eq!(episode_label(1, 7, 2), "S01E07");
        assert_eq!(episode_label(1, 7, 3), "S01E007");
        assert_eq!(episode_label(12, 1234, 3), "S12E1234");
        assert_eq!(episode_stem("Show", 2, 5, 3), "Show - S02E005");
    }

    #[test]
    fn test_unselected_files_consume_no_number() {
        let mut files = batch(&["a.mp4", "b.mp4", "c.mp4"]);
        files[1].selected = false;

        let assignments = assign(&files, &policy()).unwrap();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].index, 0);
        assert_eq!(assignments[1].index, 2);
        assert_eq!(assignments[1].episode, 2);
    }

    #[test]
    fn test_title_is_sanitized_for_names_only() {
        let files = batch(&["a.mp4"]);
        let p = NamingPolicy::new("Who? What: Why", Genre::Mystery, 2020, 1, 1);
        let a = &assign(&files, &p).unwrap()[0];
        assert_eq!(a.target_name, "Who_ What_ Why - S01E01.mp4");
        assert_eq!(a.metadata.title, "Who? What: Why");
    }

    #[test]
    fn test_invalid_policy() {
        let files = batch(&["a.mp4"]);
        let mut p = policy();
        p.start_episode = 0;
        assert!(matches!(assign(&files, &p), Err(Error::Validation(_))));

        let p = NamingPolicy::new("...", Genre::Drama, 2020, 1, 1);
        assert!(matches!(assign(&files, &p), Err(Error::Validation(_))));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let files = batch(&["a.mp4", "b.mp4"]);
        let p = NamingPolicy::new("Show", Genre::Drama, 2020, 1, u32::MAX);
        assert!(matches!(assign(&files, &p), Err(Error::Validation(_))));

        let single = batch(&["a.mp4"]);
        assert!(assign(&single, &p).is_ok());
    }

    #[test]
    fn test_inputs_untouched() {
        let files = batch(&["a.mp4"]);
        let before = files.clone();
        let _ = assign(&files, &policy()).unwrap();
        assert_eq!(files, before);
    }

    #[test]
    fn test_plan_marks_unchanged_names() {
        let files = batch(&["Show - S01E01.mp4", "other.mp4"]);
        let rows = plan(&files, &policy()).unwrap();
        assert!(!rows[0].changes_name);
        assert!(rows[1].changes_name);
        assert_eq!(rows[1].to, PathBuf::from("/tv/Show - S01E02.mp4"));
    }
}
