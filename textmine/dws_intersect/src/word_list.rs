//! Mapped word-list container.
//!
//! A [`DocumentWordList`] is the integer-mapped view of a corpus: one slot
//! per token sequence, each entry carrying the mapped id and the offsets of
//! the occurrence. The same container type doubles as the intersection
//! result, where exactly one slot is populated value by value and never
//! sealed, which is the reason [`DocumentWordList::is_nonempty`] has its
//! open-slot special case.

use dws_mapping::TokenId;

/// One mapped token occurrence: the id plus the offsets of the occurrence
/// it was mapped from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MappedToken {
    pub id: TokenId,
    pub char_offset: u16,
    pub sentence_offset: u16,
    pub word_offset: u16,
}

impl MappedToken {
    pub const fn new(id: TokenId, char_offset: u16, sentence_offset: u16, word_offset: u16) -> Self {
        MappedToken {
            id,
            char_offset,
            sentence_offset,
            word_offset,
        }
    }
}

/// One slot of a word list: a mapped token sequence with its dataset id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappedSequence {
    pub dataset_id: String,
    pub entries: Vec<MappedToken>,
}

impl MappedSequence {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        MappedSequence {
            dataset_id: dataset_id.into(),
            entries: Vec::new(),
        }
    }

    /// The ids of this sequence, in order, including any sentinels.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Entries whose id has not been overwritten with the sentinel.
    pub fn live_entries(&self) -> impl Iterator<Item = &MappedToken> {
        self.entries.iter().filter(|e| !e.id.is_sentinel())
    }

    /// Count of entries whose id is not the sentinel.
    pub fn live_len(&self) -> usize {
        self.live_entries().count()
    }
}

/// Two-dimensional mapped word container.
///
/// Slots are either *sealed* (added whole via [`append_sequence`]) or the
/// single *open* slot at index `sealed`, filled value by value via the
/// `put_one_value` operations. Corpus word lists only seal; intersection
/// results only fill the open slot.
///
/// [`append_sequence`]: DocumentWordList::append_sequence
#[derive(Clone, Debug, Default)]
pub struct DocumentWordList {
    slots: Vec<MappedSequence>,
    /// Number of sealed slots; the slot at this index, if present, is open.
    sealed: usize,
    /// Whether the offsets in this list are meaningful. True for corpus
    /// lists and intersection results, false for bare debug lists.
    intersection_data: bool,
}

impl DocumentWordList {
    /// Create an empty list whose offsets are meaningful.
    pub fn new() -> Self {
        DocumentWordList {
            slots: Vec::new(),
            sealed: 0,
            intersection_data: true,
        }
    }

    /// Create an empty list that carries ids only (offsets all zero).
    pub fn new_plain() -> Self {
        DocumentWordList {
            slots: Vec::new(),
            sealed: 0,
            intersection_data: false,
        }
    }

    /// Create the shell of an intersection result: one open slot labeled
    /// with the dataset id of the reference sequence.
    pub fn new_intersection_result(dataset_id: impl Into<String>) -> Self {
        DocumentWordList {
            slots: vec![MappedSequence::new(dataset_id)],
            sealed: 0,
            intersection_data: true,
        }
    }

    /// Append a whole sequence as a sealed slot.
    pub fn append_sequence(&mut self, sequence: MappedSequence) {
        if self.sealed == self.slots.len() {
            self.slots.push(sequence);
        } else {
            self.slots[self.sealed] = sequence;
        }
        self.sealed += 1;
    }

    /// Append one id to the open slot, with zero offsets.
    pub fn put_one_value(&mut self, id: TokenId) {
        self.put_one_value_with_offsets(id, 0, 0, 0);
    }

    /// Append one id with its offset triple to the open slot. The open
    /// slot stays open; sealed slots are unaffected.
    pub fn put_one_value_with_offsets(
        &mut self,
        id: TokenId,
        char_offset: u16,
        sentence_offset: u16,
        word_offset: u16,
    ) {
        self.open_slot()
            .entries
            .push(MappedToken::new(id, char_offset, sentence_offset, word_offset));
    }

    fn open_slot(&mut self) -> &mut MappedSequence {
        if self.sealed == self.slots.len() {
            self.slots.push(MappedSequence::default());
        }
        &mut self.slots[self.sealed]
    }

    /// All slots, sealed ones first, the open slot (if any) last.
    pub fn slots(&self) -> &[MappedSequence] {
        &self.slots
    }

    /// Mutable access to all slots. Used by the driver to overwrite
    /// stop-word ids with the sentinel in place.
    pub fn slots_mut(&mut self) -> &mut [MappedSequence] {
        &mut self.slots
    }

    /// Number of sealed slots.
    pub fn sealed_count(&self) -> usize {
        self.sealed
    }

    /// Whether the offset payload of this list is meaningful.
    pub fn intersection_data(&self) -> bool {
        self.intersection_data
    }

    /// Does the list hold any live data?
    ///
    /// "Some slot was sealed" is not enough: an intersection result keeps
    /// its single slot open forever, and stop-word filtering overwrites
    /// ids with the sentinel without shrinking the slot. So the predicate
    /// looks for a non-sentinel entry in the sealed slots, or, when
    /// nothing was sealed, in the open slot 0.
    pub fn is_nonempty(&self) -> bool {
        let limit = if self.sealed == 0 {
            self.slots.len().min(1)
        } else {
            self.sealed
        };
        self.slots[..limit]
            .iter()
            .any(|slot| slot.entries.iter().any(|e| !e.id.is_sentinel()))
    }
}
