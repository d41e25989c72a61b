/// A colour, expressed in RGB, CMYK, or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub const fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0 to 255
    pub const fn new_grey_bytes(g: u8) -> Colour {
        Colour::Grey {
            g: g as f32 / 255.0,
        }
    }

    /// CSS representation used by the HTML preview
    pub fn css(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match *self {
            Colour::RGB { r, g, b } => format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b)),
            Colour::CMYK { c, m, y, k } => {
                let r = (1.0 - c) * (1.0 - k);
                let g = (1.0 - m) * (1.0 - k);
                let b = (1.0 - y) * (1.0 - k);
                format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
            }
            Colour::Grey { g } => format!("#{0:02x}{0:02x}{0:02x}", byte(g)),
        }
    }
}

/// The palette used on official documents
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    /// Year slogan in the header
    pub const SLOGAN_RED: Colour = Colour::new_rgb_bytes(127, 29, 29);
    /// Seal border and text in the footer
    pub const SEAL_RED: Colour = Colour::new_rgb_bytes(150, 0, 0);
    /// Footer text and the authentication box border
    pub const MID_GREY: Colour = Colour::new_grey_bytes(150);
    /// Secondary text inside the authentication box
    pub const DARK_GREY: Colour = Colour::new_grey_bytes(80);
    /// Background of the authentication mark area
    pub const LIGHT_GREY: Colour = Colour::new_grey_bytes(240);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_hex() {
        assert_eq!(colours::SLOGAN_RED.css(), "#7f1d1d");
        assert_eq!(colours::BLACK.css(), "#000000");
        assert_eq!(Colour::CMYK { c: 0.0, m: 0.0, y: 0.0, k: 0.0 }.css(), "#ffffff");
    }
}
