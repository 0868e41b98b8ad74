//! Backup, dedupe and prune against files on disk.

use std::fs;

use editfx_models::VideoId;
use editfx_storage::{backup_file, delete_media_for, Dataset};
use tempfile::TempDir;

const TABLE: &str = "\
video_id,transitions_present,b_roll_footage_present,animated_graphics_present,on_screen_text_present,notes
keep1,True,False,False,False,a
drop1,False,False,False,False,b
keep1,False,False,False,True,dup
drop2,,,,,c
";

#[test]
fn test_prune_with_backup_and_media_cleanup() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("filtered").join("sports_filtered.csv");
    let media_dir = dir.path().join("kept_sports_videos");
    fs::create_dir_all(csv_path.parent().unwrap()).unwrap();
    fs::create_dir_all(&media_dir).unwrap();
    fs::write(&csv_path, TABLE).unwrap();
    for name in ["keep1.mp4", "drop1.mp4", "001_drop2.mov", "notes.txt"] {
        fs::write(media_dir.join(name), b"").unwrap();
    }

    let backup = backup_file(&csv_path, dir.path().join("backups").join("sports")).unwrap();
    assert_eq!(fs::read_to_string(&backup).unwrap(), TABLE);

    let mut dataset = Dataset::load(&csv_path).unwrap();
    let id_column = dataset.require_id_column().unwrap();
    assert_eq!(dataset.dedupe(&id_column), 1);
    let removed = dataset.prune_effectless(Some(&id_column));
    assert_eq!(removed, vec![VideoId::from("drop1"), VideoId::from("drop2")]);
    dataset.save(&csv_path).unwrap();

    let reloaded = Dataset::load(&csv_path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.records[0].get("notes"), Some("a"));
    assert_eq!(reloaded.headers.last().map(String::as_str), Some("notes"));

    let cleanup = delete_media_for(&media_dir, &removed).unwrap();
    assert_eq!(cleanup.deleted, 2);
    assert_eq!(cleanup.kept, 1);
    assert!(media_dir.join("keep1.mp4").exists());
    assert!(media_dir.join("notes.txt").exists());
}
