//! Algorithm W over Rill trees.
//!
//! The walk visits children left to right, then the node itself, threading a
//! single accumulated substitution through every step:
//!
//! ```text
//! infer(Γ, node, S) -> (τ, S')
//! ```
//!
//! `S'` extends `S` with whatever the node's own unifications decided. Types
//! returned along the way may still mention variables that `S'` binds; the
//! final substitution is applied to everything once the root is done.
//!
//! Names resolve innermost frame first: `Lambda` and each run of directly
//! nested `Let`s push a child frame of the typing context, on top of the root
//! frame holding the natives. A `Let` run is walked in a loop, so a long
//! sequence of bindings costs no stack; other nesting recurses, and trees
//! past a size threshold are walked on a worker thread with a large stack.

use crate::context::{Scheme, Subst, TypeEnv};
use crate::error::{InferError, TypeError};
use crate::infer::unify::unify;
use crate::natives::lower::monotype_of;
use crate::natives::{Natives, Signature};
use crate::tree::{NodeId, NodeKind, Tree};
use crate::types::{Ty, VarSupply};
use rill_log::{debug, error, trace, warn};
use std::collections::BTreeMap;

/// The result of a successful inference call.
#[derive(Debug, Clone)]
pub struct Typing {
    root: NodeId,
    root_type: Ty,
    types: BTreeMap<NodeId, Ty>,
    schemes: BTreeMap<NodeId, Scheme>,
    subst: Subst,
}

impl Typing {
    /// The node inference started from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The principal type of the root node.
    pub fn root_type(&self) -> &Ty {
        &self.root_type
    }

    /// The type of a visited node.
    pub fn type_of(&self, node: NodeId) -> Option<&Ty> {
        self.types.get(&node)
    }

    /// The scheme a `Let` node bound its name to.
    pub fn binding_scheme(&self, node: NodeId) -> Option<&Scheme> {
        self.schemes.get(&node)
    }

    /// The final substitution.
    pub fn subst(&self) -> &Subst {
        &self.subst
    }

    /// Every visited node with its type, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Ty)> + '_ {
        self.types.iter().map(|(node, ty)| (*node, ty))
    }

    /// Number of visited nodes.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no node was visited. Never true for a finished call.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Infer the type of `root` and of every node below it.
///
/// Every native signature is lowered first; a malformed one fails the call
/// before any node is visited. Any failure aborts the whole call, so a
/// returned [`Typing`] is always complete and consistent.
///
/// # Errors
///
/// The first [`TypeError`] found, tagged with the node it was found at.
///
/// # Panics
///
/// If `root` or any of its descendants is not a node of `tree`.
///
/// ```
/// use rill_typecheck::{infer, LiteralKind, Natives, Tree, TypeError};
///
/// let natives = Natives::new();
/// let mut tree = Tree::new();
/// let one = tree.literal(LiteralKind::Number);
/// let root = tree.apply("foo", vec![one]);
///
/// let err = infer(&natives, &tree, root).unwrap_err();
/// assert_eq!(err.node, Some(root));
/// assert_eq!(err.error, TypeError::UnboundName { name: "foo".to_string() });
/// ```
pub fn infer(natives: &Natives, tree: &Tree, root: NodeId) -> Result<Typing, InferError> {
    debug!(
        "inferring {} with {} natives over {} nodes",
        root,
        natives.len(),
        tree.len()
    );

    let mut supply = VarSupply::new();
    let globals = natives.lower_all(&mut supply).map_err(|err| {
        debug!("rejected natives: {}", err);
        InferError::detached(err)
    })?;

    let (walk, ty, subst) = if tree.len() <= INLINE_WALK_LIMIT {
        walk_tree(tree, &globals, supply, root)?
    } else {
        walk_on_worker(tree, &globals, supply, root)?
    };

    let root_type = subst.apply(&ty);
    let types = walk
        .types
        .into_iter()
        .map(|(node, ty)| (node, subst.apply(&ty)))
        .collect();
    let schemes = walk
        .schemes
        .into_iter()
        .map(|(node, scheme)| (node, subst.apply_scheme(&scheme)))
        .collect();

    debug!(
        "{} : {} ({} variables, {} bound)",
        root,
        root_type,
        walk.supply.issued(),
        subst.len()
    );

    Ok(Typing {
        root,
        root_type,
        types,
        schemes,
        subst,
    })
}

/// Trees up to this many nodes are walked on the caller's stack.
const INLINE_WALK_LIMIT: usize = 1024;

/// Stack reserved for walking larger trees. The walk recurses once per level
/// of nesting, and a long program can nest thousands of levels deep.
const WALK_STACK_SIZE: usize = 256 * 1024 * 1024;

type Walked<'t> = Result<(Walk<'t>, Ty, Subst), InferError>;

fn walk_tree<'t>(tree: &'t Tree, globals: &TypeEnv<'_>, supply: VarSupply, root: NodeId) -> Walked<'t> {
    let mut walk = Walk {
        tree,
        supply,
        types: BTreeMap::new(),
        schemes: BTreeMap::new(),
    };
    let (ty, subst) = walk.infer_node(globals, root, Subst::empty())?;
    Ok((walk, ty, subst))
}

/// Walk on a scoped worker thread with a [`WALK_STACK_SIZE`] stack.
///
/// Falls back to the caller's thread if no worker can be started. A panic on
/// the worker is resumed on the caller.
fn walk_on_worker<'t>(
    tree: &'t Tree,
    globals: &TypeEnv<'_>,
    supply: VarSupply,
    root: NodeId,
) -> Walked<'t> {
    std::thread::scope(|scope| {
        let worker_supply = supply.clone();
        let spawned = std::thread::Builder::new()
            .name("rill-infer".to_string())
            .stack_size(WALK_STACK_SIZE)
            .spawn_scoped(scope, move || walk_tree(tree, globals, worker_supply, root));

        match spawned {
            Ok(worker) => worker
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload)),
            Err(err) => {
                warn!("cannot start inference worker ({}), walking inline", err);
                walk_tree(tree, globals, supply, root)
            }
        }
    })
}

/// State of one inference call.
struct Walk<'t> {
    tree: &'t Tree,
    supply: VarSupply,
    types: BTreeMap<NodeId, Ty>,
    schemes: BTreeMap<NodeId, Scheme>,
}

type Step = Result<(Ty, Subst), InferError>;

impl Walk<'_> {
    fn infer_node(&mut self, env: &TypeEnv<'_>, id: NodeId, subst: Subst) -> Step {
        let tree = self.tree;
        let node = tree.node(id);

        let (ty, subst) = match node.kind() {
            NodeKind::Literal(kind) => (kind.ty(), subst),
            NodeKind::Reference(name) => (self.instantiate(env, id, name)?, subst),
            NodeKind::Apply(name) => self.infer_apply(env, id, name, node.children(), subst)?,
            NodeKind::Let(_) => self.infer_let_chain(env, id, subst)?,
            NodeKind::Lambda(param) => self.infer_lambda(env, param, node.children()[0], subst)?,
            NodeKind::List => self.infer_list(env, node.children(), subst)?,
            NodeKind::Hole => (self.supply.fresh_ty(), subst),
            NodeKind::Ascribe(sig) => self.infer_ascribe(env, id, sig, node.children()[0], subst)?,
        };

        self.types.insert(id, ty.clone());
        Ok((ty, subst))
    }

    /// Walk `let a = .. in let b = .. in body` without recursing per link.
    ///
    /// All links of the chain bind into one child frame, in order, so each
    /// bound expression sees the links before it and a repeated name replaces
    /// the earlier binding. Every link has the body's type; the caller records
    /// the type of `id` itself.
    #[inline(never)]
    fn infer_let_chain(&mut self, env: &TypeEnv<'_>, id: NodeId, subst: Subst) -> Step {
        let tree = self.tree;
        let mut scope = env.child();
        let mut subst = subst;
        let mut links = Vec::new();
        let mut cur = id;

        while let NodeKind::Let(name) = tree.node(cur).kind() {
            let children = tree.node(cur).children();
            let (bound_ty, next) = self.infer_node(&scope, children[0], subst)?;
            subst = next;

            let scheme = scope.generalize(&bound_ty, &subst);
            trace!("let {} : {}", name, scheme);

            scope.bind(name.clone(), scheme.clone());
            self.schemes.insert(cur, scheme);
            links.push(cur);
            cur = children[1];
        }

        let (ty, subst) = self.infer_node(&scope, cur, subst)?;
        for &link in links.iter().skip(1) {
            self.types.insert(link, ty.clone());
        }
        Ok((ty, subst))
    }

    #[inline(never)]
    fn infer_lambda(&mut self, env: &TypeEnv<'_>, param: &str, body: NodeId, subst: Subst) -> Step {
        let param_ty = self.supply.fresh_ty();

        let mut scope = env.child();
        scope.bind(param, Scheme::mono(param_ty.clone()));

        let (body_ty, subst) = self.infer_node(&scope, body, subst)?;
        Ok((subst.apply(&Ty::function(param_ty, body_ty)), subst))
    }

    #[inline(never)]
    fn infer_list(&mut self, env: &TypeEnv<'_>, items: &[NodeId], subst: Subst) -> Step {
        let elem = self.supply.fresh_ty();
        let mut subst = subst;
        for &item in items {
            let (item_ty, next) = self.infer_node(env, item, subst)?;
            subst = self.unify_at(item, &elem, &item_ty, next)?;
        }
        Ok((subst.apply(&Ty::list(elem)), subst))
    }

    #[inline(never)]
    fn infer_ascribe(
        &mut self,
        env: &TypeEnv<'_>,
        id: NodeId,
        sig: &Signature,
        expr: NodeId,
        subst: Subst,
    ) -> Step {
        let (expr_ty, subst) = self.infer_node(env, expr, subst)?;
        let annotated = monotype_of(sig, &mut self.supply).map_err(|err| self.fail(id, err))?;
        let subst = self.unify_at(id, &annotated, &expr_ty, subst)?;
        Ok((subst.apply(&annotated), subst))
    }

    /// Apply `name` to `args`, one parameter at a time.
    ///
    /// The operator's type is split into `param -> rest` for every argument.
    /// A split that fails means the operator takes fewer parameters and is
    /// reported at the application; a parameter that does not accept its
    /// argument is reported at the argument. Leftover parameters stay in the
    /// result, so a partial application has a function type.
    #[inline(never)]
    fn infer_apply(
        &mut self,
        env: &TypeEnv<'_>,
        id: NodeId,
        name: &str,
        args: &[NodeId],
        subst: Subst,
    ) -> Step {
        let mut subst = subst;
        let mut arg_types = Vec::with_capacity(args.len());
        for &arg in args {
            let (ty, next) = self.infer_node(env, arg, subst)?;
            arg_types.push(ty);
            subst = next;
        }

        let mut op = self.instantiate(env, id, name)?;
        for (&arg, arg_ty) in args.iter().zip(&arg_types) {
            let param = self.supply.fresh_ty();
            let rest = self.supply.fresh_ty();

            let arrow = Ty::function(param.clone(), rest.clone());
            subst = self.unify_at(id, &arrow, &op, subst)?;
            subst = self.unify_at(arg, &param, arg_ty, subst)?;
            op = rest;
        }

        Ok((subst.apply(&op), subst))
    }

    fn instantiate(&mut self, env: &TypeEnv<'_>, id: NodeId, name: &str) -> Result<Ty, InferError> {
        match env.lookup(name) {
            Some(scheme) => Ok(scheme.instantiate(&mut self.supply)),
            None => Err(self.fail(
                id,
                TypeError::UnboundName {
                    name: name.to_string(),
                },
            )),
        }
    }

    /// Unify under `subst` and extend it, blaming `id` on failure.
    fn unify_at(
        &self,
        id: NodeId,
        expected: &Ty,
        found: &Ty,
        subst: Subst,
    ) -> Result<Subst, InferError> {
        let step = unify(&subst.apply(expected), &subst.apply(found))
            .map_err(|err| self.fail(id, err))?;
        let mut subst = subst;
        subst.extend(step);
        Ok(subst)
    }

    fn fail(&self, id: NodeId, err: TypeError) -> InferError {
        if err.is_internal() {
            error!("{} at {}", err, id);
        } else {
            debug!("{} at {}", err, id);
        }
        InferError::at(id, err)
    }
}
