//! Bracketed point lists: `[x1,y1],[x2,y2],...`.
//!
//! Anything between pairs is ignored, so `[1,2] [3,4]` and `[1,2];[3,4]` both work.

use crate::error::Error;
use crate::geom::Point;

pub fn parse_points(input: &str) -> Result<Vec<Point>, Error> {
    let opens = input.matches('[').count();
    let closes = input.matches(']').count();
    if opens == 0 {
        return Err(Error::parse(input.trim(), "no `[x,y]` pair found"));
    }
    if opens != closes {
        return Err(Error::parse(
            input.trim(),
            format!("unbalanced brackets ({opens} `[` vs {closes} `]`)"),
        ));
    }

    let mut out = Vec::with_capacity(opens);
    let mut rest = input;
    while let Some(start) = rest.find('[') {
        let after = &rest[start + 1..];
        let end = after
            .find(']')
            .ok_or_else(|| Error::parse(&rest[start..], "missing `]`"))?;
        out.push(parse_pair(&after[..end])?);
        rest = &after[end + 1..];
    }
    Ok(out)
}

fn parse_pair(body: &str) -> Result<Point, Error> {
    let frag = || format!("[{body}]");
    let mut it = body.split(',');
    let (Some(x), Some(y), None) = (it.next(), it.next(), it.next()) else {
        return Err(Error::parse(frag(), "expected exactly two comma-separated numbers"));
    };
    let coord = |s: &str| -> Result<f64, Error> {
        let v: f64 = s
            .trim()
            .parse()
            .map_err(|e| Error::parse(frag(), format!("`{}`: {e}", s.trim())))?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(Error::parse(frag(), "coordinates must be finite"))
        }
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}
