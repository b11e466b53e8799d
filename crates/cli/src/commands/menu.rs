//! Menu choices and menu rendering

/// Width of one menu column
const COLUMN_WIDTH: usize = 30;

/// Menu entries per row
const COLUMNS: usize = 3;

/// Number that used to close the menu; still accepted as Exit
const LEGACY_EXIT: u8 = 22;

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreateFolder,
    UploadFile,
    UploadFiles,
    DeleteFile,
    DeleteFiles,
    DeleteFolder,
    DownloadFile,
    DownloadFiles,
    ListBucketsAndObjects,
    BucketInfo,
    ObjectInfo,
    SetBucketPolicy,
    DeleteBucketPolicy,
    SetBucketAcl,
    DeleteBucket,
    SetRegion,
    MoveFiles,
    RenameFile,
    MoveFolders,
    RenameFolders,
    PresignedUrl,
    GetBucketPolicy,
    CreateBucket,
    SwitchBucket,
    Exit,
}

impl MenuChoice {
    /// Every operation, in menu order; `Exit` is listed separately
    pub const OPERATIONS: [MenuChoice; 24] = [
        Self::CreateFolder,
        Self::UploadFile,
        Self::UploadFiles,
        Self::DeleteFile,
        Self::DeleteFiles,
        Self::DeleteFolder,
        Self::DownloadFile,
        Self::DownloadFiles,
        Self::ListBucketsAndObjects,
        Self::BucketInfo,
        Self::ObjectInfo,
        Self::SetBucketPolicy,
        Self::DeleteBucketPolicy,
        Self::SetBucketAcl,
        Self::DeleteBucket,
        Self::SetRegion,
        Self::MoveFiles,
        Self::RenameFile,
        Self::MoveFolders,
        Self::RenameFolders,
        Self::PresignedUrl,
        Self::GetBucketPolicy,
        Self::CreateBucket,
        Self::SwitchBucket,
    ];

    /// Number the operator types to pick this entry
    pub const fn number(self) -> u8 {
        match self {
            Self::CreateFolder => 1,
            Self::UploadFile => 2,
            Self::UploadFiles => 3,
            Self::DeleteFile => 4,
            Self::DeleteFiles => 5,
            Self::DeleteFolder => 6,
            Self::DownloadFile => 7,
            Self::DownloadFiles => 8,
            Self::ListBucketsAndObjects => 9,
            Self::BucketInfo => 10,
            Self::ObjectInfo => 11,
            Self::SetBucketPolicy => 12,
            Self::DeleteBucketPolicy => 13,
            Self::SetBucketAcl => 14,
            Self::DeleteBucket => 15,
            Self::SetRegion => 16,
            Self::MoveFiles => 17,
            Self::RenameFile => 18,
            Self::MoveFolders => 19,
            Self::RenameFolders => 20,
            Self::PresignedUrl => 21,
            Self::GetBucketPolicy => 23,
            Self::CreateBucket => 24,
            Self::SwitchBucket => 25,
            Self::Exit => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateFolder => "Create a folder",
            Self::UploadFile => "Upload a single file",
            Self::UploadFiles => "Upload multiple files",
            Self::DeleteFile => "Delete a single file",
            Self::DeleteFiles => "Delete multiple files",
            Self::DeleteFolder => "Delete a folder",
            Self::DownloadFile => "Download a single file",
            Self::DownloadFiles => "Download multiple files",
            Self::ListBucketsAndObjects => "List Buckets and Objects",
            Self::BucketInfo => "Get Bucket Information",
            Self::ObjectInfo => "Get Object Information",
            Self::SetBucketPolicy => "Set Bucket Policy",
            Self::DeleteBucketPolicy => "Delete Bucket Policy",
            Self::SetBucketAcl => "Set Bucket ACL",
            Self::DeleteBucket => "Delete Bucket",
            Self::SetRegion => "Set a Region",
            Self::MoveFiles => "Move a File",
            Self::RenameFile => "Rename a File",
            Self::MoveFolders => "Move a Folder",
            Self::RenameFolders => "Rename a Folder",
            Self::PresignedUrl => "Generate a Pre-signed URL",
            Self::GetBucketPolicy => "Get Bucket Policy",
            Self::CreateBucket => "Create a Bucket",
            Self::SwitchBucket => "Switch Bucket",
            Self::Exit => "Exit",
        }
    }

    /// Parse the operator's answer to "Enter your choice"
    ///
    /// `0`, `22` and the words exit, quit and q all mean Exit.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if matches!(input.to_ascii_lowercase().as_str(), "exit" | "quit" | "q") {
            return Some(Self::Exit);
        }

        let number: u8 = input.parse().ok()?;
        if number == 0 || number == LEGACY_EXIT {
            return Some(Self::Exit);
        }
        Self::OPERATIONS.into_iter().find(|c| c.number() == number)
    }

    fn entry(self) -> String {
        format!("{}. {}", self.number(), self.label())
    }
}

/// The full menu text, three entries per row, exit line last
pub fn render() -> String {
    let mut menu = String::from("Choose an option:\n");
    for row in MenuChoice::OPERATIONS.chunks(COLUMNS) {
        let line: Vec<String> = row
            .iter()
            .map(|choice| format!("{:<width$}", choice.entry(), width = COLUMN_WIDTH))
            .collect();
        menu.push_str(line.join(" ").trim_end());
        menu.push('\n');
    }
    menu.push_str(&MenuChoice::Exit.entry());
    menu.push('\n');
    menu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_skip_the_exit_alias() {
        let numbers: Vec<u8> = MenuChoice::OPERATIONS.iter().map(|c| c.number()).collect();
        let expected: Vec<u8> = (1..=25).filter(|n| *n != LEGACY_EXIT).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::CreateFolder));
        assert_eq!(MenuChoice::parse(" 21\n"), Some(MenuChoice::PresignedUrl));
        assert_eq!(MenuChoice::parse("23"), Some(MenuChoice::GetBucketPolicy));
        assert_eq!(MenuChoice::parse("25"), Some(MenuChoice::SwitchBucket));
        assert_eq!(MenuChoice::parse("26"), None);
        assert_eq!(MenuChoice::parse("-1"), None);
        assert_eq!(MenuChoice::parse("abc"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_parse_exit_words() {
        for input in ["0", "22", "exit", "QUIT", "q"] {
            assert_eq!(MenuChoice::parse(input), Some(MenuChoice::Exit));
        }
    }

    #[test]
    fn test_render_layout() {
        let menu = render();
        let lines: Vec<&str> = menu.lines().collect();
        assert_eq!(lines[0], "Choose an option:");
        assert!(lines[1].starts_with("1. Create a folder"));
        assert_eq!(lines[1].find("2. Upload a single file"), Some(31));
        assert_eq!(lines[1].find("3. Upload multiple files"), Some(62));
        assert_eq!(lines.last(), Some(&"0. Exit"));
        // 24 operations in rows of three, plus heading and exit line
        assert_eq!(lines.len(), 10);
    }
}
