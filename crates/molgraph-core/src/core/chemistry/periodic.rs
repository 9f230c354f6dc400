use phf::{Map, phf_map};

/// Static properties of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInfo {
    pub number: u8,
    /// Valence-shell electron count used by charge adjustment.
    pub outer_electrons: u8,
    /// Allowed total bond-order sums, ascending. Empty for metals and noble gases,
    /// which get no implicit hydrogens.
    pub valences: &'static [u8],
    /// Standard atomic weight.
    pub weight: f64,
    /// Display color hint as `#RRGGBB`.
    pub color: &'static str,
}

static ELEMENTS: Map<&'static str, ElementInfo> = phf_map! {
    "H" => ElementInfo { number: 1, outer_electrons: 1, valences: &[1], weight: 1.008, color: "#909090" },
    "D" => ElementInfo { number: 1, outer_electrons: 1, valences: &[1], weight: 2.014, color: "#909090" },
    "T" => ElementInfo { number: 1, outer_electrons: 1, valences: &[1], weight: 3.016, color: "#909090" },
    "He" => ElementInfo { number: 2, outer_electrons: 2, valences: &[], weight: 4.003, color: "#000000" },
    "Li" => ElementInfo { number: 3, outer_electrons: 1, valences: &[1], weight: 6.941, color: "#000000" },
    "Be" => ElementInfo { number: 4, outer_electrons: 2, valences: &[2], weight: 9.012, color: "#000000" },
    "B" => ElementInfo { number: 5, outer_electrons: 3, valences: &[3], weight: 10.811, color: "#FFB5B5" },
    "C" => ElementInfo { number: 6, outer_electrons: 4, valences: &[4], weight: 12.011, color: "#000000" },
    "N" => ElementInfo { number: 7, outer_electrons: 5, valences: &[3, 5], weight: 14.007, color: "#0000FF" },
    "O" => ElementInfo { number: 8, outer_electrons: 6, valences: &[2], weight: 15.999, color: "#FF0000" },
    "F" => ElementInfo { number: 9, outer_electrons: 7, valences: &[1], weight: 18.998, color: "#00CC00" },
    "Ne" => ElementInfo { number: 10, outer_electrons: 8, valences: &[], weight: 20.180, color: "#000000" },
    "Na" => ElementInfo { number: 11, outer_electrons: 1, valences: &[1], weight: 22.990, color: "#000000" },
    "Mg" => ElementInfo { number: 12, outer_electrons: 2, valences: &[2], weight: 24.305, color: "#000000" },
    "Al" => ElementInfo { number: 13, outer_electrons: 3, valences: &[3], weight: 26.982, color: "#000000" },
    "Si" => ElementInfo { number: 14, outer_electrons: 4, valences: &[4], weight: 28.086, color: "#F0C8A0" },
    "P" => ElementInfo { number: 15, outer_electrons: 5, valences: &[3, 5], weight: 30.974, color: "#FF8000" },
    "S" => ElementInfo { number: 16, outer_electrons: 6, valences: &[2, 4, 6], weight: 32.065, color: "#CCCC00" },
    "Cl" => ElementInfo { number: 17, outer_electrons: 7, valences: &[1, 3, 5, 7], weight: 35.453, color: "#00CC00" },
    "Ar" => ElementInfo { number: 18, outer_electrons: 8, valences: &[], weight: 39.948, color: "#000000" },
    "K" => ElementInfo { number: 19, outer_electrons: 1, valences: &[1], weight: 39.098, color: "#000000" },
    "Ca" => ElementInfo { number: 20, outer_electrons: 2, valences: &[2], weight: 40.078, color: "#000000" },
    "Sc" => ElementInfo { number: 21, outer_electrons: 3, valences: &[], weight: 44.956, color: "#808080" },
    "Ti" => ElementInfo { number: 22, outer_electrons: 4, valences: &[], weight: 47.867, color: "#808080" },
    "V" => ElementInfo { number: 23, outer_electrons: 5, valences: &[], weight: 50.942, color: "#808080" },
    "Cr" => ElementInfo { number: 24, outer_electrons: 6, valences: &[], weight: 51.996, color: "#808080" },
    "Mn" => ElementInfo { number: 25, outer_electrons: 7, valences: &[], weight: 54.938, color: "#808080" },
    "Fe" => ElementInfo { number: 26, outer_electrons: 8, valences: &[], weight: 55.845, color: "#808080" },
    "Co" => ElementInfo { number: 27, outer_electrons: 9, valences: &[], weight: 58.933, color: "#808080" },
    "Ni" => ElementInfo { number: 28, outer_electrons: 10, valences: &[], weight: 58.693, color: "#808080" },
    "Cu" => ElementInfo { number: 29, outer_electrons: 11, valences: &[], weight: 63.546, color: "#808080" },
    "Zn" => ElementInfo { number: 30, outer_electrons: 12, valences: &[], weight: 65.38, color: "#808080" },
    "Ga" => ElementInfo { number: 31, outer_electrons: 3, valences: &[3], weight: 69.723, color: "#000000" },
    "Ge" => ElementInfo { number: 32, outer_electrons: 4, valences: &[4], weight: 72.630, color: "#000000" },
    "As" => ElementInfo { number: 33, outer_electrons: 5, valences: &[3, 5], weight: 74.922, color: "#000000" },
    "Se" => ElementInfo { number: 34, outer_electrons: 6, valences: &[2, 4, 6], weight: 78.971, color: "#FFA100" },
    "Br" => ElementInfo { number: 35, outer_electrons: 7, valences: &[1, 3, 5, 7], weight: 79.904, color: "#A52A2A" },
    "Kr" => ElementInfo { number: 36, outer_electrons: 8, valences: &[], weight: 83.798, color: "#000000" },
    "Rb" => ElementInfo { number: 37, outer_electrons: 1, valences: &[1], weight: 85.468, color: "#000000" },
    "Sr" => ElementInfo { number: 38, outer_electrons: 2, valences: &[2], weight: 87.62, color: "#000000" },
    "Y" => ElementInfo { number: 39, outer_electrons: 3, valences: &[], weight: 88.906, color: "#808080" },
    "Zr" => ElementInfo { number: 40, outer_electrons: 4, valences: &[], weight: 91.224, color: "#808080" },
    "Nb" => ElementInfo { number: 41, outer_electrons: 5, valences: &[], weight: 92.906, color: "#808080" },
    "Mo" => ElementInfo { number: 42, outer_electrons: 6, valences: &[], weight: 95.95, color: "#808080" },
    "Tc" => ElementInfo { number: 43, outer_electrons: 7, valences: &[], weight: 98.0, color: "#808080" },
    "Ru" => ElementInfo { number: 44, outer_electrons: 8, valences: &[], weight: 101.07, color: "#808080" },
    "Rh" => ElementInfo { number: 45, outer_electrons: 9, valences: &[], weight: 102.906, color: "#808080" },
    "Pd" => ElementInfo { number: 46, outer_electrons: 10, valences: &[], weight: 106.42, color: "#808080" },
    "Ag" => ElementInfo { number: 47, outer_electrons: 11, valences: &[], weight: 107.868, color: "#808080" },
    "Cd" => ElementInfo { number: 48, outer_electrons: 12, valences: &[], weight: 112.414, color: "#808080" },
    "In" => ElementInfo { number: 49, outer_electrons: 3, valences: &[3], weight: 114.818, color: "#000000" },
    "Sn" => ElementInfo { number: 50, outer_electrons: 4, valences: &[2, 4], weight: 118.710, color: "#000000" },
    "Sb" => ElementInfo { number: 51, outer_electrons: 5, valences: &[3, 5], weight: 121.760, color: "#000000" },
    "Te" => ElementInfo { number: 52, outer_electrons: 6, valences: &[2, 4, 6], weight: 127.60, color: "#000000" },
    "I" => ElementInfo { number: 53, outer_electrons: 7, valences: &[1, 3, 5, 7], weight: 126.904, color: "#A020F0" },
    "Xe" => ElementInfo { number: 54, outer_electrons: 8, valences: &[], weight: 131.293, color: "#000000" },
    "Cs" => ElementInfo { number: 55, outer_electrons: 1, valences: &[1], weight: 132.905, color: "#000000" },
    "Ba" => ElementInfo { number: 56, outer_electrons: 2, valences: &[2], weight: 137.327, color: "#000000" },
    "La" => ElementInfo { number: 57, outer_electrons: 3, valences: &[], weight: 138.905, color: "#808080" },
    "Ce" => ElementInfo { number: 58, outer_electrons: 4, valences: &[], weight: 140.116, color: "#808080" },
    "Pr" => ElementInfo { number: 59, outer_electrons: 3, valences: &[], weight: 140.908, color: "#808080" },
    "Nd" => ElementInfo { number: 60, outer_electrons: 4, valences: &[], weight: 144.242, color: "#808080" },
    "Pm" => ElementInfo { number: 61, outer_electrons: 5, valences: &[], weight: 145.0, color: "#808080" },
    "Sm" => ElementInfo { number: 62, outer_electrons: 6, valences: &[], weight: 150.36, color: "#808080" },
    "Eu" => ElementInfo { number: 63, outer_electrons: 7, valences: &[], weight: 151.964, color: "#808080" },
    "Gd" => ElementInfo { number: 64, outer_electrons: 8, valences: &[], weight: 157.25, color: "#808080" },
    "Tb" => ElementInfo { number: 65, outer_electrons: 9, valences: &[], weight: 158.925, color: "#808080" },
    "Dy" => ElementInfo { number: 66, outer_electrons: 10, valences: &[], weight: 162.500, color: "#808080" },
    "Ho" => ElementInfo { number: 67, outer_electrons: 11, valences: &[], weight: 164.930, color: "#808080" },
    "Er" => ElementInfo { number: 68, outer_electrons: 12, valences: &[], weight: 167.259, color: "#808080" },
    "Tm" => ElementInfo { number: 69, outer_electrons: 13, valences: &[], weight: 168.934, color: "#808080" },
    "Yb" => ElementInfo { number: 70, outer_electrons: 14, valences: &[], weight: 173.045, color: "#808080" },
    "Lu" => ElementInfo { number: 71, outer_electrons: 3, valences: &[], weight: 174.967, color: "#808080" },
    "Hf" => ElementInfo { number: 72, outer_electrons: 4, valences: &[], weight: 178.49, color: "#808080" },
    "Ta" => ElementInfo { number: 73, outer_electrons: 5, valences: &[], weight: 180.948, color: "#808080" },
    "W" => ElementInfo { number: 74, outer_electrons: 6, valences: &[], weight: 183.84, color: "#808080" },
    "Re" => ElementInfo { number: 75, outer_electrons: 7, valences: &[], weight: 186.207, color: "#808080" },
    "Os" => ElementInfo { number: 76, outer_electrons: 8, valences: &[], weight: 190.23, color: "#808080" },
    "Ir" => ElementInfo { number: 77, outer_electrons: 9, valences: &[], weight: 192.217, color: "#808080" },
    "Pt" => ElementInfo { number: 78, outer_electrons: 10, valences: &[], weight: 195.084, color: "#808080" },
    "Au" => ElementInfo { number: 79, outer_electrons: 11, valences: &[], weight: 196.967, color: "#808080" },
    "Hg" => ElementInfo { number: 80, outer_electrons: 12, valences: &[], weight: 200.592, color: "#808080" },
    "Tl" => ElementInfo { number: 81, outer_electrons: 3, valences: &[1, 3], weight: 204.383, color: "#000000" },
    "Pb" => ElementInfo { number: 82, outer_electrons: 4, valences: &[2, 4], weight: 207.2, color: "#000000" },
    "Bi" => ElementInfo { number: 83, outer_electrons: 5, valences: &[3, 5], weight: 208.980, color: "#000000" },
    "Po" => ElementInfo { number: 84, outer_electrons: 6, valences: &[2, 4, 6], weight: 209.0, color: "#000000" },
    "At" => ElementInfo { number: 85, outer_electrons: 7, valences: &[1, 3, 5, 7], weight: 210.0, color: "#000000" },
    "Rn" => ElementInfo { number: 86, outer_electrons: 8, valences: &[], weight: 222.0, color: "#000000" },
    "Fr" => ElementInfo { number: 87, outer_electrons: 1, valences: &[1], weight: 223.0, color: "#000000" },
    "Ra" => ElementInfo { number: 88, outer_electrons: 2, valences: &[2], weight: 226.0, color: "#000000" },
    "Ac" => ElementInfo { number: 89, outer_electrons: 3, valences: &[], weight: 227.0, color: "#808080" },
    "Th" => ElementInfo { number: 90, outer_electrons: 4, valences: &[], weight: 232.038, color: "#808080" },
    "Pa" => ElementInfo { number: 91, outer_electrons: 3, valences: &[], weight: 231.036, color: "#808080" },
    "U" => ElementInfo { number: 92, outer_electrons: 4, valences: &[], weight: 238.029, color: "#808080" },
};

/// Looks up an element by symbol. Symbols are case sensitive (`"Co"` is cobalt,
/// `"CO"` is nothing).
pub fn element(symbol: &str) -> Option<&'static ElementInfo> {
    ELEMENTS.get(symbol)
}

pub fn is_element(symbol: &str) -> bool {
    ELEMENTS.contains_key(symbol)
}

pub fn atomic_number(symbol: &str) -> Option<u8> {
    element(symbol).map(|e| e.number)
}

pub fn atomic_weight(symbol: &str) -> Option<f64> {
    element(symbol).map(|e| e.weight)
}

/// Elements whose negative charge raises rather than lowers the valence sum.
pub fn inverts_negative_charge(symbol: &str) -> bool {
    matches!(symbol, "B" | "P" | "Si")
}

pub fn is_halogen(symbol: &str) -> bool {
    matches!(symbol, "F" | "Cl" | "Br" | "I" | "At")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_expected_entries() {
        let carbon = element("C").unwrap();
        assert_eq!(carbon.number, 6);
        assert_eq!(carbon.outer_electrons, 4);
        assert_eq!(carbon.valences, &[4]);

        let nitrogen = element("N").unwrap();
        assert_eq!(nitrogen.valences, &[3, 5]);
        assert_eq!(nitrogen.outer_electrons, 5);

        assert_eq!(element("Cl").unwrap().valences, &[1, 3, 5, 7]);
    }

    #[test]
    fn lookup_is_case_sensitive_and_rejects_query_symbols() {
        assert!(is_element("Co"));
        assert!(!is_element("CO"));
        assert!(!is_element("*"));
        assert!(!is_element("R"));
        assert!(!is_element("Q"));
    }

    #[test]
    fn metals_and_noble_gases_have_no_valence_states() {
        assert!(element("Fe").unwrap().valences.is_empty());
        assert!(element("Ne").unwrap().valences.is_empty());
    }

    #[test]
    fn weights_and_numbers_are_consistent() {
        assert_eq!(atomic_number("U"), Some(92));
        assert!((atomic_weight("O").unwrap() - 15.999).abs() < 1e-9);
        assert!(atomic_weight("Xx").is_none());
    }

    #[test]
    fn charge_inversion_and_halogen_sets() {
        assert!(inverts_negative_charge("B"));
        assert!(inverts_negative_charge("Si"));
        assert!(!inverts_negative_charge("N"));
        assert!(is_halogen("Br"));
        assert!(!is_halogen("H"));
    }
}
