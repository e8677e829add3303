//! Surface, palette and raster implementation.

use std::fmt;

use ::{NUM_COLS,Palette,RasterMut,Rect,Surface};

impl Rect {
    /// Create a rectangle from its edges.
    pub fn new(left: usize, top: usize, right: usize, bottom: usize)
            -> Self {
        Rect {
            left: left,
            top: top,
            right: right,
            bottom: bottom,
        }
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }
}

impl Surface {
    /// Allocate a zero-filled surface.
    pub fn new(w: usize, h: usize) -> Self {
        Surface {
            w: w,
            h: h,
            buf: vec![0; w * h],
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> usize {
        self.w
    }

    /// Surface height in pixels.
    pub fn height(&self) -> usize {
        self.h
    }

    /// All pixels, row by row.
    pub fn pixels(&self) -> &[u8] {
        &self.buf[..]
    }

    /// The pixels of row y.
    ///
    /// # Panics
    ///
    /// Panics if y is not less than the height.
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.h);
        &self.buf[(self.w * y)..(self.w * (y + 1))]
    }

    /// The colour index at (x, y), if it lies inside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.w && y < self.h {
            Some(self.buf[self.w * y + x])
        } else {
            None
        }
    }

    /// Rectangle covering the whole surface.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.w, self.h)
    }

    pub(crate) fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..]
    }
}

impl Palette {
    /// Allocate an all-black palette.
    pub fn new() -> Self {
        Palette {
            pal: [0; 3 * NUM_COLS],
        }
    }

    /// The (r, g, b) triple for a colour index.
    pub fn get(&self, idx: u8) -> (u8, u8, u8) {
        let i = 3 * idx as usize;
        (self.pal[i], self.pal[i + 1], self.pal[i + 2])
    }

    /// The palette as packed RGB triples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pal[..]
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pal[..]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new()
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.pal.chunks(3)).finish()
    }
}

impl<'a> RasterMut<'a> {
    /// Wrap a screen buffer, palette memory and dirty rectangle list.
    ///
    /// # Examples
    ///
    /// ```
    /// const SCREEN_W: usize = 320;
    /// const SCREEN_H: usize = 200;
    /// const NUM_COLS: usize = 256;
    /// let mut buf = [0; SCREEN_W * SCREEN_H];
    /// let mut pal = [0; 3 * NUM_COLS];
    /// let mut dirty = Vec::new();
    ///
    /// flicdec::RasterMut::new(SCREEN_W, SCREEN_H, &mut buf, &mut pal, &mut dirty);
    /// ```
    pub fn new(w: usize, h: usize,
            buf: &'a mut [u8], pal: &'a mut [u8], dirty: &'a mut Vec<Rect>)
            -> Self {
        assert!(w * h <= buf.len());
        assert!(pal.len() == 3 * NUM_COLS);

        RasterMut {
            w: w,
            h: h,
            buf: buf,
            pal: pal,
            dirty: dirty,
        }
    }

    /// Replace the dirty rectangles with one covering the whole frame.
    pub fn mark_all_dirty(&mut self) {
        self.dirty.clear();
        self.dirty.push(Rect::new(0, 0, self.w, self.h));
    }

    /// Append a dirty rectangle.
    pub fn mark_dirty(&mut self, rect: Rect) {
        self.dirty.push(rect);
    }
}
