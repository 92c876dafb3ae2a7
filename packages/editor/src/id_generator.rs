use crate::node::NodeId;
use crate::region::RegionContent;
use crc32fast::Hasher;

/// Derive a short, stable seed from an arbitrary namespace string
pub fn seed_from(namespace: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes and pages of one store
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(namespace: &str) -> Self {
        Self::from_seed(seed_from(namespace))
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past every `seed-N` id in `existing`, so ids
    /// saved by an earlier session are never issued again
    pub fn skip_past<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        let prefix = format!("{}-", self.seed);
        let highest = existing
            .into_iter()
            .filter_map(|id| id.strip_prefix(prefix.as_str())?.parse::<u64>().ok())
            .max();
        if let Some(highest) = highest {
            self.count = self.count.max(highest);
        }
    }

    /// Next id not already present in `content`
    pub fn fresh_id(&mut self, content: &RegionContent) -> NodeId {
        loop {
            let id = self.new_id();
            if !content.contains(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
