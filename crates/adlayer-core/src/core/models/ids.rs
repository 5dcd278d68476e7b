use slotmap::new_key_type;

new_key_type! {
    /// A unique identifier for a placed molecule within a layer.
    pub struct MoleculeId;
    /// A unique identifier for a selection block within a layer.
    pub struct BlockId;
}
