use crate::algebra::*;

/// Ordered set of inequality rows currently held at equality.
///
/// Order is insertion order and determines the layout of the
/// inequality multipliers returned by each KKT solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    active: Vec<usize>,
    is_active: Vec<bool>,
}

impl WorkingSet {
    /// An empty working set over `m` inequality rows
    pub fn new(m: usize) -> Self {
        Self {
            active: Vec::new(),
            is_active: vec![false; m],
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.is_active.get(row).copied().unwrap_or(false)
    }

    /// Appends `row`.  Returns false if it was already present.
    pub fn add(&mut self, row: usize) -> bool {
        if self.contains(row) {
            return false;
        }
        self.active.push(row);
        self.is_active[row] = true;
        true
    }

    /// Removes the row at position `pos` and returns it
    pub fn remove_at(&mut self, pos: usize) -> usize {
        let row = self.active.remove(pos);
        self.is_active[row] = false;
        row
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.is_active.iter_mut().for_each(|v| *v = false);
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.active
    }
}

/// Current state of the active-set iteration
#[derive(Debug, Clone, Default)]
pub struct Iterate<T> {
    pub x: Vec<T>,
    pub workingset: WorkingSet,

    /// multipliers for the reduced equality rows
    pub ν: Vec<T>,

    /// multipliers for the rows of `multiplier_set`, in the same order
    pub λ: Vec<T>,

    /// working set at the time `λ` was computed
    pub multiplier_set: Vec<usize>,
}

impl<T> Iterate<T>
where
    T: FloatT,
{
    pub fn new(x: Vec<T>, m: usize) -> Self {
        Self {
            x,
            workingset: WorkingSet::new(m),
            ν: Vec::new(),
            λ: Vec::new(),
            multiplier_set: Vec::new(),
        }
    }

    /// Store multipliers `μ = [ν; λ]` from a KKT solve against the
    /// current working set, with `neq` equality entries first
    pub fn save_multipliers(&mut self, μ: &[T], neq: usize) {
        let (ν, λ) = μ.split_at(usize::min(neq, μ.len()));
        self.ν = ν.to_vec();
        self.λ = λ.to_vec();
        self.multiplier_set = self.workingset.as_slice().to_vec();
    }

    /// x ← x + αd
    pub fn take_step(&mut self, d: &[T], α: T) {
        self.x.axpby(α, d, T::one());
    }
}

#[test]
fn test_workingset() {
    let mut ws = WorkingSet::new(4);
    assert!(ws.is_empty());
    assert!(ws.add(2));
    assert!(ws.add(0));
    assert!(!ws.add(2));
    assert_eq!(ws.as_slice(), &[2, 0]);
    assert!(ws.contains(0) && !ws.contains(1) && !ws.contains(9));

    assert_eq!(ws.remove_at(0), 2);
    assert_eq!(ws.as_slice(), &[0]);
    assert!(!ws.contains(2));

    ws.clear();
    assert_eq!(ws.len(), 0);
    assert!(!ws.contains(0));
}

#[test]
fn test_iterate_multipliers() {
    let mut it = Iterate::<f64>::new(vec![0., 0.], 3);
    it.workingset.add(1);
    it.workingset.add(2);
    it.save_multipliers(&[5., -1., 2.], 1);
    assert_eq!(it.ν, vec![5.]);
    assert_eq!(it.λ, vec![-1., 2.]);
    assert_eq!(it.multiplier_set, vec![1, 2]);

    // later changes to the working set do not touch the snapshot
    it.workingset.remove_at(0);
    assert_eq!(it.multiplier_set, vec![1, 2]);

    it.take_step(&[1., 2.], 0.5);
    assert_eq!(it.x, vec![0.5, 1.0]);
}
