//!
//! Alignment traces: the recorded state path of one sampled sequence
//!
//! Both samplers speak the same trace vocabulary, so a core-model trace is
//! directly comparable to a profile trace. A trace starts with `S` and ends
//! with `T`; each step records the state label, the model node (zero unless
//! the state is a match/insert/delete), and the sequence position (zero
//! unless a residue was emitted at that step).
//!
use crate::alphabet::Residue;
use crate::error::EmitError;

///
/// State labels of the profile trace vocabulary.
///
/// `S`/`T` are the start/terminal markers, `N`/`C`/`J` the background-
/// emitting flanks, `B`/`E` the domain begin/end markers, `G`/`L` the
/// glocal/local entry markers, and the `M`/`I`/`D` pairs the main model
/// states in glocal and local flavor.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    S,
    N,
    B,
    G,
    L,
    MG,
    ML,
    IG,
    IL,
    DG,
    DL,
    E,
    J,
    C,
    T,
}

impl State {
    pub fn is_match(self) -> bool {
        matches!(self, State::MG | State::ML)
    }
    pub fn is_insert(self) -> bool {
        matches!(self, State::IG | State::IL)
    }
    pub fn is_delete(self) -> bool {
        matches!(self, State::DG | State::DL)
    }
    ///
    /// match/insert/delete: the states that carry a model node index
    ///
    pub fn is_main(self) -> bool {
        self.is_match() || self.is_insert() || self.is_delete()
    }
    ///
    /// N/C/J flanks emit only when looping on themselves
    ///
    pub fn is_flank(self) -> bool {
        matches!(self, State::N | State::C | State::J)
    }
    ///
    /// Legal label adjacency `self -> next` in a sampled trace.
    ///
    pub fn can_precede(self, next: State) -> bool {
        use State::*;
        match self {
            S => matches!(next, N),
            N => matches!(next, N | B),
            B => matches!(next, G | L),
            G => matches!(next, MG | DG),
            L => matches!(next, ML),
            MG => matches!(next, MG | IG | DG | E),
            ML => matches!(next, ML | IL | DL | E),
            IG => matches!(next, MG | IG),
            IL => matches!(next, ML | IL),
            DG => matches!(next, MG | DG | E),
            DL => matches!(next, ML | DL | E),
            E => matches!(next, C | J),
            J => matches!(next, J | B),
            C => matches!(next, C | T),
            T => false,
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            State::S => "S",
            State::N => "N",
            State::B => "B",
            State::G => "G",
            State::L => "L",
            State::MG => "MG",
            State::ML => "ML",
            State::IG => "IG",
            State::IL => "IL",
            State::DG => "DG",
            State::DL => "DL",
            State::E => "E",
            State::J => "J",
            State::C => "C",
            State::T => "T",
        };
        write!(f, "{}", name)
    }
}

///
/// One (state, node, position) record of a trace.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub state: State,
    /// model node 1..=M for match/insert/delete, 0 otherwise
    pub node: usize,
    /// sequence position 1..=L if a residue was emitted here, 0 otherwise
    pub pos: usize,
}

///
/// Append-only record of one sampled state path.
///
/// `model_len`/`seq_len` are the summary fields set by `close()` when a
/// sampler finishes successfully.
///
#[derive(Debug, Clone, Default)]
pub struct Trace {
    steps: Vec<TraceStep>,
    pub model_len: usize,
    pub seq_len: usize,
}

impl Trace {
    pub fn new() -> Trace {
        Trace::default()
    }
    ///
    /// Reset for a fresh emission call, keeping the allocation.
    ///
    pub fn reuse(&mut self) {
        self.steps.clear();
        self.model_len = 0;
        self.seq_len = 0;
    }
    ///
    /// Append one step.
    ///
    pub fn append(&mut self, state: State, node: usize, pos: usize) -> Result<(), EmitError> {
        self.steps.try_reserve(1)?;
        self.steps.push(TraceStep { state, node, pos });
        Ok(())
    }
    ///
    /// Set the summary fields on successful termination.
    ///
    pub fn close(&mut self, model_len: usize, seq_len: usize) {
        self.model_len = model_len;
        self.seq_len = seq_len;
    }
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }
    pub fn iter(&self) -> std::slice::Iter<TraceStep> {
        self.steps.iter()
    }
    ///
    /// Count match states per domain (B..E stretch), in order.
    ///
    pub fn matches_per_domain(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        let mut current: Option<usize> = None;
        for step in self.steps.iter() {
            match step.state {
                State::B => current = Some(0),
                State::E => {
                    if let Some(n) = current.take() {
                        counts.push(n);
                    }
                }
                s if s.is_match() => {
                    if let Some(n) = current.as_mut() {
                        *n += 1;
                    }
                }
                _ => {}
            }
        }
        counts
    }

    ///
    /// Structural validation of this trace against the sequence it claims
    /// to have emitted.
    ///
    /// Checks: S/N opening, T termination, legal label adjacency, node
    /// indices in range and consistent between consecutive main states,
    /// positions non-decreasing and bumped exactly on emitting steps,
    /// residue codes within the alphabet, and the summary fields.
    ///
    pub fn validate(&self, residues: &[Residue], k_alphabet: usize) -> Result<(), String> {
        let m = self.model_len;
        if self.steps.len() < 3 {
            return Err(format!("trace too short: {} steps", self.steps.len()));
        }
        if self.steps[0].state != State::S || self.steps[0].node != 0 || self.steps[0].pos != 0 {
            return Err("trace does not start with S(0,0)".to_string());
        }
        if self.steps[1].state != State::N {
            return Err("second trace record is not N".to_string());
        }
        if self.steps[self.steps.len() - 1].state != State::T {
            return Err("trace does not end with T".to_string());
        }

        // Glocal domains must exit from node M; local domains may exit anywhere.
        #[derive(PartialEq)]
        enum Entry {
            Glocal,
            Local,
        }
        let mut entry: Option<Entry> = None;

        let mut i = 0; // emitted residues so far
        for z in 1..self.steps.len() {
            let prev = &self.steps[z - 1];
            let step = &self.steps[z];
            if !prev.state.can_precede(step.state) {
                return Err(format!(
                    "illegal transition {} -> {} at step {}",
                    prev.state, step.state, z
                ));
            }

            // node index rules
            if step.state.is_main() {
                if step.node < 1 || step.node > m {
                    return Err(format!(
                        "node {} out of range 1..={} at step {}",
                        step.node, m, z
                    ));
                }
                match prev.state {
                    State::G => {
                        if step.node != 1 {
                            return Err(format!("glocal entry at node {} != 1", step.node));
                        }
                    }
                    State::L => {} // local entry may start anywhere
                    s if s.is_main() => {
                        let expected = if step.state.is_insert() {
                            prev.node
                        } else {
                            prev.node + 1
                        };
                        if step.node != expected {
                            return Err(format!(
                                "node jump {} -> {} at step {} ({} -> {})",
                                prev.node, step.node, z, prev.state, step.state
                            ));
                        }
                    }
                    _ => {}
                }
            } else if step.node != 0 {
                return Err(format!(
                    "state {} carries node {} (must be 0)",
                    step.state, step.node
                ));
            }

            match step.state {
                State::G => entry = Some(Entry::Glocal),
                State::L => entry = Some(Entry::Local),
                State::E => {
                    if entry == Some(Entry::Glocal) && prev.node != m {
                        return Err(format!("glocal domain exits at node {} != {}", prev.node, m));
                    }
                    entry = None;
                }
                _ => {}
            }

            // position / emission rules
            if step.pos != 0 {
                if step.pos != i + 1 {
                    return Err(format!(
                        "position {} at step {} (expected {})",
                        step.pos,
                        z,
                        i + 1
                    ));
                }
                let legal_emitter = step.state.is_match()
                    || step.state.is_insert()
                    || (step.state.is_flank() && prev.state == step.state);
                if !legal_emitter {
                    return Err(format!("state {} cannot emit at step {}", step.state, z));
                }
                match residues.get(i) {
                    Some(&x) if (x as usize) < k_alphabet => {}
                    Some(&x) => return Err(format!("residue code {} out of alphabet", x)),
                    None => return Err("trace emits more residues than sequence".to_string()),
                }
                i += 1;
            } else if step.state.is_match() || step.state.is_insert() {
                return Err(format!(
                    "match/insert step {} has no emitted position",
                    z
                ));
            }
        }

        if i != residues.len() {
            return Err(format!(
                "trace emitted {} residues, sequence has {}",
                i,
                residues.len()
            ));
        }
        if i != self.seq_len {
            return Err(format!(
                "trace summary seq_len {} != emitted count {}",
                self.seq_len, i
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for step in self.steps.iter() {
            writeln!(f, "{}\t{}\t{}", step.state, step.node, step.pos)?;
        }
        writeln!(f, "# M={} L={}", self.model_len, self.seq_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glocal_trace() -> Trace {
        // S N B G M1 I1 M2 D3 E C T over a model of length 3
        let mut tr = Trace::new();
        let steps = [
            (State::S, 0, 0),
            (State::N, 0, 0),
            (State::B, 0, 0),
            (State::G, 0, 0),
            (State::MG, 1, 1),
            (State::IG, 1, 2),
            (State::MG, 2, 3),
            (State::DG, 3, 0),
            (State::E, 0, 0),
            (State::C, 0, 0),
            (State::T, 0, 0),
        ];
        for &(s, node, pos) in steps.iter() {
            tr.append(s, node, pos).unwrap();
        }
        tr.close(3, 3);
        tr
    }

    #[test]
    fn trace_validate_accepts_legal_path() {
        let tr = glocal_trace();
        tr.validate(&[0, 1, 2], 4).unwrap();
    }
    #[test]
    fn trace_validate_catches_residue_count() {
        let tr = glocal_trace();
        assert!(tr.validate(&[0, 1], 4).is_err());
        assert!(tr.validate(&[0, 1, 2, 3], 4).is_err());
    }
    #[test]
    fn trace_validate_catches_bad_adjacency() {
        let mut tr = Trace::new();
        tr.append(State::S, 0, 0).unwrap();
        tr.append(State::B, 0, 0).unwrap(); // S -> B is illegal
        tr.append(State::T, 0, 0).unwrap();
        tr.close(3, 0);
        assert!(tr.validate(&[], 4).is_err());
    }
    #[test]
    fn trace_validate_catches_node_jump() {
        let mut tr = glocal_trace();
        // rewrite M2 as M3: node jump 1 -> 3
        let steps: Vec<TraceStep> = tr
            .steps()
            .iter()
            .map(|&s| {
                if s.state == State::MG && s.node == 2 {
                    TraceStep {
                        state: State::MG,
                        node: 3,
                        pos: s.pos,
                    }
                } else {
                    s
                }
            })
            .collect();
        tr.reuse();
        for s in steps {
            tr.append(s.state, s.node, s.pos).unwrap();
        }
        tr.close(3, 3);
        assert!(tr.validate(&[0, 1, 2], 4).is_err());
    }
    #[test]
    fn trace_reuse_drops_contents() {
        let mut tr = glocal_trace();
        tr.reuse();
        assert!(tr.is_empty());
        assert_eq!(tr.model_len, 0);
        assert_eq!(tr.seq_len, 0);
    }
    #[test]
    fn trace_matches_per_domain() {
        let tr = glocal_trace();
        assert_eq!(tr.matches_per_domain(), vec![2]);
    }
    #[test]
    fn trace_display() {
        let tr = glocal_trace();
        let s = tr.to_string();
        assert!(s.starts_with("S\t0\t0\n"));
        assert!(s.contains("MG\t1\t1"));
        assert!(s.ends_with("# M=3 L=3\n"));
    }
}
