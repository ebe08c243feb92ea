use pdf_writer::Ref;
use std::collections::HashMap;

#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    ContentForPage(usize),
    Font(usize),
    CidFont(usize),
    ToUnicode(usize),
    FontDescriptor(usize),
    FontData(usize),
    Image(usize),
    ImageMask(usize),
}

/// Hands out PDF object ids and remembers which object each one was for
pub struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    fn new_id(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Allocate the id for `ref_type`; each object gets exactly one
    pub fn gen(&mut self, ref_type: RefType) -> Ref {
        let id = self.new_id();
        let previous = self.refs.insert(ref_type, id);
        debug_assert!(previous.is_none(), "{ref_type:?} was allocated twice");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_handed_out_in_order() {
        let mut refs = ObjectReferences::new();
        assert_eq!(refs.gen(RefType::Catalog), Ref::new(1));
        assert_eq!(refs.gen(RefType::PageTree), Ref::new(2));
        assert_eq!(refs.gen(RefType::Page(0)), Ref::new(3));
        assert_eq!(refs.gen(RefType::Page(1)), Ref::new(4));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "allocated twice")]
    fn objects_cannot_be_allocated_twice() {
        let mut refs = ObjectReferences::new();
        refs.gen(RefType::Font(0));
        refs.gen(RefType::Font(0));
    }
}
