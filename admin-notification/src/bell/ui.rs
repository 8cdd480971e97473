use tokio::sync::broadcast;

/// Where a pointer click landed relative to the bell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Bell,
    Dropdown,
    Outside,
}

impl std::str::FromStr for ClickTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bell" => Ok(Self::Bell),
            "dropdown" => Ok(Self::Dropdown),
            "outside" => Ok(Self::Outside),
            _ => Err(format!("unknown click target: {s}")),
        }
    }
}

/// Document-level click stream that components listen on.
///
/// Cheap to clone. Each listener holds its own receiver, so
/// `listener_count` shows how many components still have one registered.
#[derive(Clone)]
pub struct ClickBus {
    tx: broadcast::Sender<ClickTarget>,
}

impl ClickBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Returns the number of listeners that will see the click.
    pub fn emit(&self, target: ClickTarget) -> usize {
        // Err only means nobody is listening.
        self.tx.send(target).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClickTarget> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ClickBus {
    fn default() -> Self {
        Self::new()
    }
}
