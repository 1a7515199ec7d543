//! Metadata service fields and the configuration keys they populate

/// A metadata-service field read at configure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    /// Public DNS name of the node
    Host,
    /// Instance identifier
    WorkerId,
    /// Machine image the node was launched from
    WorkerType,
    /// Availability zone
    WorkerGroup,
    /// Instance size/class
    WorkerNodeType,
}

impl MetadataField {
    /// Every field, in the order they are reported.
    pub const ALL: [MetadataField; 5] = [
        MetadataField::Host,
        MetadataField::WorkerId,
        MetadataField::WorkerType,
        MetadataField::WorkerGroup,
        MetadataField::WorkerNodeType,
    ];

    /// Path under `{base}/meta-data/`.
    pub fn suffix(self) -> &'static str {
        match self {
            MetadataField::Host => "public-hostname",
            MetadataField::WorkerId => "instance-id",
            MetadataField::WorkerType => "ami-id",
            MetadataField::WorkerGroup => "placement/availability-zone",
            MetadataField::WorkerNodeType => "instance-type",
        }
    }

    /// Key written into the resolved configuration.
    pub fn config_key(self) -> &'static str {
        match self {
            MetadataField::Host => "host",
            MetadataField::WorkerId => "workerId",
            MetadataField::WorkerType => "workerType",
            MetadataField::WorkerGroup => "workerGroup",
            MetadataField::WorkerNodeType => "workerNodeType",
        }
    }

    /// Fields the worker cannot identify itself without.
    ///
    /// Transport failures on these abort configuration instead of degrading
    /// to an empty value.
    pub fn is_identity(self) -> bool {
        matches!(self, MetadataField::Host | MetadataField::WorkerId)
    }

    /// Full URL of this field under `base_url`.
    pub fn url(self, base_url: &str) -> String {
        format!("{base_url}/meta-data/{}", self.suffix())
    }
}
