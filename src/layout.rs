use std::path::PathBuf;

const PUBLIC_DIR: &str = "public";
const IMAGES_DIR: &str = "downloaded_images";

/// Category-scoped file naming under one output root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ledger_path(&self, category: &str) -> PathBuf {
        self.root.join(format!("scraped_links_{category}.txt"))
    }

    pub fn sheet_path(&self, category: &str) -> PathBuf {
        self.root.join(format!("{category}_scraped_data.xlsx"))
    }

    pub fn json_path(&self, category: &str) -> PathBuf {
        self.root.join(format!("{category}_scraped_data.json"))
    }

    pub fn category_image_dir(&self, category: &str) -> PathBuf {
        self.root.join(PUBLIC_DIR).join(IMAGES_DIR).join(category)
    }

    pub fn item_image_dir(&self, category: &str, folder: &str) -> PathBuf {
        self.category_image_dir(category).join(folder)
    }
}

/// Path of a downloaded image as served from the `public` directory.
pub fn public_image_path(category: &str, folder: &str, file_name: &str) -> String {
    format!("/{IMAGES_DIR}/{category}/{folder}/{file_name}")
}

pub fn image_file_name(index: usize) -> String {
    format!("image_{}.jpg", index + 1)
}

const UNTITLED_FOLDER: &str = "untitled";

/// Folder name for an item: path separators in the title become dashes.
/// Titles that would name the current or parent directory get a fixed name.
pub fn sanitize_title(title: &str) -> String {
    let folder = title.replace(['/', '\\'], "-");
    if folder.trim().chars().all(|ch| ch == '.') {
        return UNTITLED_FOLDER.to_owned();
    }
    folder
}
