use slotmap::new_key_type;

new_key_type! {
    /// Identifies a foreground entity in the board arena. Every cell of a
    /// multi-cell footprint stores the same id.
    pub struct EntityId;
}
