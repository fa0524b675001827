use labelcrop::CropBox;

/// Parse a box argument like "100,50,200,300" (x, y, width, height).
pub fn parse_box(input: &str) -> Result<CropBox, String> {
    let values = input
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid number: '{part}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [x, y, width, height] = values[..] else {
        return Err(format!(
            "expected 4 comma-separated values (x,y,width,height), got {}",
            values.len()
        ));
    };
    if x < 0.0 || y < 0.0 {
        return Err("box position must not be negative".to_string());
    }
    if width <= 0.0 || height <= 0.0 {
        return Err("box width and height must be positive".to_string());
    }
    Ok(CropBox::new(x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_values() {
        assert_eq!(
            parse_box("100,50,200,300").unwrap(),
            CropBox::new(100.0, 50.0, 200.0, 300.0)
        );
    }

    #[test]
    fn whitespace_and_decimals() {
        assert_eq!(
            parse_box(" 1.5, 2 ,3.25,4 ").unwrap(),
            CropBox::new(1.5, 2.0, 3.25, 4.0)
        );
    }

    #[test]
    fn wrong_count() {
        let err = parse_box("1,2,3").unwrap_err();
        assert!(err.contains("got 3"), "got: {err}");
    }

    #[test]
    fn not_a_number() {
        let err = parse_box("1,2,three,4").unwrap_err();
        assert!(err.contains("three"), "got: {err}");
    }

    #[test]
    fn non_finite_rejected() {
        assert!(parse_box("1,2,inf,4").is_err());
        assert!(parse_box("NaN,2,3,4").is_err());
    }

    #[test]
    fn negative_position_rejected() {
        assert!(parse_box("-1,2,3,4").is_err());
    }

    #[test]
    fn empty_size_rejected() {
        assert!(parse_box("1,2,0,4").is_err());
    }
}
