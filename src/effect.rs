//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch and enrich the page starting at `offset`
    LoadPage { generation: u64, offset: u32 },
    /// Fetch one full record for the detail screen
    LoadDetail { generation: u64, id: String },
    LoadImage { url: String },
}
