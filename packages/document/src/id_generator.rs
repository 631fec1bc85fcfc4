use crc32fast::Hasher;

/// Stable seed for a document, derived from its name with CRC32
pub fn get_document_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(b"page://");
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes created inside a document
///
/// Ids look like `<seed>-<n>`. The generator does not know which ids already
/// exist in a tree; use [`IdGenerator::skip_past`] after loading a document
/// that was produced by the same seed.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(document_name: &str) -> Self {
        Self {
            seed: get_document_seed(document_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past every `<seed>-<n>` id in `ids`
    pub fn skip_past<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let prefix = format!("{}-", self.seed);
        for id in ids {
            if let Some(n) = id.strip_prefix(&prefix).and_then(|n| n.parse::<u32>().ok()) {
                self.count = self.count.max(n);
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
