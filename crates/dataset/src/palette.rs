use indexmap::IndexMap;

/// Categorical palette; categories beyond its length wrap around.
pub const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c",
    "#98df8a", "#d62728", "#ff9896", "#9467bd", "#c5b0d5",
    "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f",
    "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Colour per category, handed out in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    assigned: IndexMap<String, &'static str>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, category: &str) -> &'static str {
        if let Some(&color) = self.assigned.get(category) {
            return color;
        }

        let color = PALETTE[self.assigned.len() % PALETTE.len()];
        self.assigned.insert(category.to_string(), color);
        color
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
