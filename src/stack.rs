use glam::{Mat4, Vec3};

/// Hierarchical transform composition with save/restore semantics.
///
/// The stack always has a current matrix; `push` saves a copy of it and `pop`
/// restores the last saved copy. Every drawn object composes its local
/// transform onto [`MatrixStack::current`], uploads it, draws and pops.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }

    /// Number of saved entries below the current matrix.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Replaces the current matrix unconditionally.
    pub fn load(&mut self, matrix: Mat4) {
        self.current = matrix;
    }

    /// Duplicates the current matrix onto the stack.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Discards the current matrix and exposes the previously pushed one.
    ///
    /// # Panics
    ///
    /// Panics when there is no matching `push`. An unbalanced pop is a bug in
    /// the caller, not a runtime condition.
    pub fn pop(&mut self) {
        self.current = self
            .saved
            .pop()
            .unwrap_or_else(|| panic!("matrix stack underflow: pop without matching push"));
    }

    /// Right-multiplies the current matrix in place.
    pub fn multiply(&mut self, local: Mat4) {
        self.current *= local;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_y(degrees.to_radians()));
    }

    pub fn scale(&mut self, factor: Vec3) {
        self.multiply(Mat4::from_scale(factor));
    }

    /// Runs `body` between a `push` and its `pop`.
    pub fn scoped<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let depth = self.depth();
        let result = body(self);
        debug_assert_eq!(depth, self.depth(), "unbalanced push/pop inside scope");
        self.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn balanced_sequences_restore_depth_and_matrix() {
        let mut stack = MatrixStack::new();
        stack.load(Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
        let before = stack.current();

        stack.push();
        stack.translate(Vec3::X);
        stack.push();
        stack.rotate_y(30.0);
        stack.scale(Vec3::splat(2.0));
        assert_eq!(stack.depth(), 2);
        stack.pop();
        stack.pop();

        assert_eq!(stack.depth(), 0);
        assert!(approx_eq(stack.current(), before));
    }

    #[test]
    fn multiply_composes_on_the_right() {
        let mut stack = MatrixStack::new();
        let parent = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let local = Mat4::from_scale(Vec3::splat(3.0));
        stack.load(parent);
        stack.multiply(local);
        assert!(approx_eq(stack.current(), parent * local));
    }

    #[test]
    fn push_duplicates_top() {
        let mut stack = MatrixStack::new();
        let matrix = Mat4::from_rotation_x(0.3);
        stack.load(matrix);
        stack.push();
        assert!(approx_eq(stack.current(), matrix));
        stack.load(Mat4::IDENTITY);
        stack.pop();
        assert!(approx_eq(stack.current(), matrix));
    }

    #[test]
    fn scoped_restores_after_body() {
        let mut stack = MatrixStack::new();
        let value = stack.scoped(|inner| {
            inner.translate(Vec3::Y);
            inner.scoped(|deeper| deeper.depth())
        });
        assert_eq!(value, 2);
        assert_eq!(stack.depth(), 0);
        assert!(approx_eq(stack.current(), Mat4::IDENTITY));
    }

    #[test]
    #[should_panic(expected = "matrix stack underflow")]
    fn pop_on_empty_stack_panics() {
        let mut stack = MatrixStack::new();
        stack.pop();
    }
}
