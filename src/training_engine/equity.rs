//! Preflop all-in equity of each hand class against one random hand.
//!
//! Indexed like the 13x13 grid: pairs on the diagonal, suited hands above it
//! (`[high][low]`), offsuit hands below it (`[low][high]`). Ranks run ace
//! first. Values are Monte Carlo estimates, good to about half a percent.

#[rustfmt::skip]
pub const PREFLOP_EQUITY: [[f64; 13]; 13] = [
    // A
    [0.851, 0.676, 0.660, 0.651, 0.644, 0.634, 0.617, 0.613, 0.600, 0.599, 0.592, 0.576, 0.580],
    // K
    [0.651, 0.822, 0.635, 0.629, 0.621, 0.601, 0.585, 0.574, 0.565, 0.558, 0.548, 0.543, 0.535],
    // Q
    [0.648, 0.616, 0.797, 0.600, 0.588, 0.571, 0.561, 0.546, 0.536, 0.531, 0.516, 0.503, 0.503],
    // J
    [0.634, 0.604, 0.581, 0.775, 0.575, 0.554, 0.539, 0.528, 0.502, 0.498, 0.488, 0.485, 0.478],
    // T
    [0.622, 0.596, 0.571, 0.554, 0.750, 0.541, 0.523, 0.510, 0.486, 0.468, 0.465, 0.456, 0.448],
    // 9
    [0.610, 0.580, 0.559, 0.532, 0.514, 0.721, 0.506, 0.489, 0.477, 0.458, 0.442, 0.433, 0.427],
    // 8
    [0.597, 0.562, 0.535, 0.514, 0.500, 0.479, 0.695, 0.480, 0.462, 0.446, 0.423, 0.410, 0.403],
    // 7
    [0.590, 0.554, 0.516, 0.493, 0.477, 0.460, 0.449, 0.662, 0.456, 0.439, 0.421, 0.398, 0.381],
    // 6
    [0.576, 0.542, 0.502, 0.480, 0.461, 0.444, 0.431, 0.425, 0.630, 0.433, 0.412, 0.397, 0.374],
    // 5
    [0.574, 0.534, 0.499, 0.471, 0.445, 0.427, 0.417, 0.401, 0.403, 0.602, 0.411, 0.401, 0.377],
    // 4
    [0.573, 0.521, 0.496, 0.462, 0.436, 0.405, 0.395, 0.381, 0.382, 0.380, 0.566, 0.390, 0.364],
    // 3
    [0.557, 0.517, 0.483, 0.452, 0.427, 0.398, 0.379, 0.366, 0.363, 0.372, 0.345, 0.535, 0.360],
    // 2
    [0.549, 0.506, 0.473, 0.443, 0.418, 0.390, 0.370, 0.345, 0.342, 0.342, 0.331, 0.322, 0.504],
];
